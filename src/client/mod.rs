//! Payment client
//!
//! [`XPayments`] is the entry point of the crate. It owns the configuration
//! snapshot, the rate-limit window state and the simulated processor, and runs
//! every operation through the same pipeline:
//!
//! ```text
//! caller -> admission (rate limiter) -> retry driver
//!        -> [simulated delay -> validation -> failure injection -> response]
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use rust_xpayments::{Mode, PaymentConfig, XPayments};
//! use rust_xpayments::types::{Customer, PaymentRequest};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> rust_xpayments::Result<()> {
//! let client = XPayments::init(PaymentConfig::new("sk_live_abc", Mode::Live))?;
//!
//! let request = PaymentRequest::new(Decimal::new(9999, 2), "USD")
//!     .with_customer(Customer::with_email("test@example.com"));
//! let payment = client.create_payment(&request).await?;
//!
//! let status = client.get_payment_status(&payment.id).await?;
//! println!("{} is {}", status.id, status.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! `XPayments` is cheap to clone; clones share state. Any number of operations
//! may be in flight at once, each suspended independently during its simulated
//! latency and backoff. Admission is serialized by the rate limiter.
//!
//! Operations run to completion; wrap them in `tokio::time::timeout` to impose
//! a deadline.

use crate::config::PaymentConfig;
use crate::rate_limit::RateLimiter;
use crate::retry::with_retry;
use crate::simulator::{self, Outcomes, PaymentSimulator};
use crate::types::{operations, PaymentRequest, PaymentResponse};
use crate::{validation, PaymentError, Result};
use std::sync::{Arc, RwLock};


/// Simulated payment-processing client
#[derive(Debug, Clone)]
pub struct XPayments {
    config: Arc<RwLock<Arc<PaymentConfig>>>,
    rate_limiter: RateLimiter,
    simulator: PaymentSimulator,
}

impl XPayments {
    /// Validate `config` and create a client with random simulated outcomes
    ///
    /// Fails with `InvalidApiKey` when the key is empty, or when the mode is
    /// test and the key is not the test key.
    pub fn init(config: PaymentConfig) -> Result<Self> {
        let config = config.normalized()?;
        log_init(&config);

        Ok(Self {
            config: Arc::new(RwLock::new(Arc::new(config))),
            rate_limiter: RateLimiter::new(),
            simulator: PaymentSimulator::default(),
        })
    }

    /// Replace the source of simulated latency, failures and statuses
    pub fn with_outcomes(mut self, outcomes: Arc<dyn Outcomes>) -> Self {
        self.simulator = PaymentSimulator::new(outcomes);
        self
    }

    /// Replace the configuration snapshot wholesale
    ///
    /// Operations already in flight keep the snapshot they started with.
    /// Rate-limit state is kept.
    pub fn reinit(&self, config: PaymentConfig) -> Result<()> {
        let config = Arc::new(config.normalized()?);
        log_init(&config);

        let mut current = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = config;
        Ok(())
    }

    /// A copy of the current configuration
    pub fn config(&self) -> PaymentConfig {
        self.snapshot().as_ref().clone()
    }

    /// Create a payment
    ///
    /// Rate-limit denial fails with `RateLimited` and is never retried. An
    /// invalid request fails once, without any simulated latency. Injected
    /// transient failures are retried per the retry policy and the last one is
    /// surfaced unchanged.
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        let config = self.snapshot();
        self.admit(operations::CREATE_PAYMENT, &config).await?;

        validation::validate(request)?;

        let response = with_retry(&config.retry, |_| {
            self.simulator.attempt_payment(&config, request)
        })
        .await?;

        tracing::info!(
            payment_id = %response.id,
            amount = %response.amount,
            currency = %response.currency,
            "Payment succeeded"
        );
        Ok(response)
    }

    /// Look up the status of a payment
    ///
    /// The simulated processor keeps no history: any id with the `pay_`
    /// prefix yields a fresh response with a simulated status.
    pub async fn get_payment_status(&self, payment_id: &str) -> Result<PaymentResponse> {
        let config = self.snapshot();
        self.admit(operations::GET_STATUS, &config).await?;

        simulator::check_payment_id(payment_id)?;

        with_retry(&config.retry, |_| {
            self.simulator.attempt_status(&config, payment_id)
        })
        .await
    }

    /// Clear every rate-limit window
    pub async fn reset_rate_limits(&self) {
        self.rate_limiter.reset().await;
    }

    /// The rate limiter shared by this client and its clones
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    fn snapshot(&self) -> Arc<PaymentConfig> {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn admit(&self, operation: &str, config: &PaymentConfig) -> Result<()> {
        if self
            .rate_limiter
            .check_and_record(operation, &config.rate_limit)
            .await
        {
            Ok(())
        } else {
            tracing::warn!(operation, "Rate limit exceeded");
            Err(PaymentError::rate_limited("Too many requests"))
        }
    }
}

fn log_init(config: &PaymentConfig) {
    if config.debug {
        tracing::info!("XPayments initialized with config: {:?}", config);
    }
}
