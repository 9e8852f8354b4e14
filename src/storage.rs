//! Storage for settled payment records
//!
//! The payment client never persists anything itself. This module gives
//! callers a record shape and a trait-based storage abstraction to persist
//! successful responses in, enabling different backends per deployment.
//!
//! ## Backends
//!
//! - **In-Memory**: Default storage (data lost on restart)
//! - **Redis**: Persistent storage (enable with `redis` feature)

use crate::types::{Metadata, PaymentResponse, PaymentStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Payment record {id} already exists")]
    Duplicate { id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Flattened, persistable view of a settled payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Build the record for a payment response
    pub fn from_response(response: &PaymentResponse) -> Self {
        let customer = response.customer.as_ref();

        Self {
            id: response.id.clone(),
            amount: response.amount,
            currency: response.currency.clone(),
            status: response.status,
            customer_email: customer.and_then(|c| c.email.clone()),
            customer_name: customer.and_then(|c| c.name.clone()),
            description: response.description.clone(),
            metadata: response.metadata.clone(),
            created_at: response.created_at,
            updated_at: response.updated_at,
        }
    }
}

impl From<&PaymentResponse> for PaymentRecord {
    fn from(response: &PaymentResponse) -> Self {
        Self::from_response(response)
    }
}

/// Trait for storing and querying payment records
#[async_trait]
pub trait PaymentRecordStore: Send + Sync {
    /// Insert a new record; fails if the id is already stored
    async fn insert(&self, record: PaymentRecord) -> StoreResult<PaymentRecord>;

    /// Fetch a record by payment id
    async fn get(&self, id: &str) -> StoreResult<Option<PaymentRecord>>;

    /// Update the status of a record, returning the updated record if found
    async fn update_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> StoreResult<Option<PaymentRecord>>;

    /// Most recent records, newest first
    async fn recent(&self, limit: usize) -> StoreResult<Vec<PaymentRecord>>;

    /// Records for a customer email, newest first
    async fn by_email(&self, email: &str) -> StoreResult<Vec<PaymentRecord>>;
}

/// In-memory storage implementation
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, PaymentRecord>>>,
}

impl InMemoryRecordStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn newest_first(records: &mut [PaymentRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl PaymentRecordStore for InMemoryRecordStore {
    async fn insert(&self, record: PaymentRecord) -> StoreResult<PaymentRecord> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::Duplicate { id: record.id });
        }
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> StoreResult<Option<PaymentRecord>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(id).map(|record| {
            record.status = status;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<PaymentRecord>> {
        let records = self.records.read().await;
        let mut all: Vec<PaymentRecord> = records.values().cloned().collect();
        newest_first(&mut all);
        all.truncate(limit);
        Ok(all)
    }

    async fn by_email(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<PaymentRecord> = records
            .values()
            .filter(|r| r.customer_email.as_deref() == Some(email))
            .cloned()
            .collect();
        newest_first(&mut matching);
        Ok(matching)
    }
}


#[cfg(feature = "redis")]
pub mod redis_storage {
    use super::{PaymentRecord, PaymentRecordStore, StoreError, StoreResult};
    use crate::types::PaymentStatus;
    use chrono::Utc;
    use redis::{AsyncCommands, Client};

    /// Redis-based storage implementation
    ///
    /// Records are stored as JSON under `<prefix><id>`. A sorted set scored by
    /// creation time backs `recent`, and one set per email backs `by_email`.
    #[derive(Debug, Clone)]
    pub struct RedisRecordStore {
        client: Client,
        key_prefix: String,
    }

    impl RedisRecordStore {
        /// Create a new Redis store
        ///
        /// # Arguments
        ///
        /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
        /// * `key_prefix` - Optional prefix for Redis keys (default: "xpayments:payment:")
        pub fn new(redis_url: &str, key_prefix: Option<&str>) -> StoreResult<Self> {
            let client = Client::open(redis_url)?;
            let key_prefix = key_prefix.unwrap_or("xpayments:payment:").to_string();

            Ok(Self { client, key_prefix })
        }

        fn record_key(&self, id: &str) -> String {
            format!("{}{}", self.key_prefix, id)
        }

        fn recent_key(&self) -> String {
            format!("{}index:recent", self.key_prefix)
        }

        fn email_key(&self, email: &str) -> String {
            format!("{}index:email:{}", self.key_prefix, email)
        }

        async fn connection(&self) -> StoreResult<redis::aio::MultiplexedConnection> {
            Ok(self.client.get_multiplexed_async_connection().await?)
        }

        async fn load_many(&self, ids: Vec<String>) -> StoreResult<Vec<PaymentRecord>> {
            let mut records = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(record) = self.get(&id).await? {
                    records.push(record);
                }
            }
            Ok(records)
        }
    }

    #[async_trait::async_trait]
    impl PaymentRecordStore for RedisRecordStore {
        async fn insert(&self, record: PaymentRecord) -> StoreResult<PaymentRecord> {
            let mut conn = self.connection().await?;
            let json = serde_json::to_string(&record)?;

            let created: bool = conn.set_nx(self.record_key(&record.id), json).await?;
            if !created {
                return Err(StoreError::Duplicate { id: record.id });
            }

            conn.zadd::<_, _, _, ()>(
                self.recent_key(),
                &record.id,
                record.created_at.timestamp_millis(),
            )
            .await?;
            if let Some(email) = &record.customer_email {
                conn.sadd::<_, _, ()>(self.email_key(email), &record.id)
                    .await?;
            }

            Ok(record)
        }

        async fn get(&self, id: &str) -> StoreResult<Option<PaymentRecord>> {
            let mut conn = self.connection().await?;
            let json: Option<String> = conn.get(self.record_key(id)).await?;

            match json {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            }
        }

        async fn update_status(
            &self,
            id: &str,
            status: PaymentStatus,
        ) -> StoreResult<Option<PaymentRecord>> {
            let Some(mut record) = self.get(id).await? else {
                return Ok(None);
            };
            record.status = status;
            record.updated_at = Utc::now();

            let mut conn = self.connection().await?;
            let json = serde_json::to_string(&record)?;
            conn.set::<_, _, ()>(self.record_key(id), json).await?;

            Ok(Some(record))
        }

        async fn recent(&self, limit: usize) -> StoreResult<Vec<PaymentRecord>> {
            if limit == 0 {
                return Ok(Vec::new());
            }
            let mut conn = self.connection().await?;
            let ids: Vec<String> = conn
                .zrevrange(self.recent_key(), 0, limit as isize - 1)
                .await?;
            self.load_many(ids).await
        }

        async fn by_email(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
            let mut conn = self.connection().await?;
            let ids: Vec<String> = conn.smembers(self.email_key(email)).await?;

            let mut records = self.load_many(ids).await?;
            super::newest_first(&mut records);
            Ok(records)
        }
    }

}
