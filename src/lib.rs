//! # XPayments Rust Implementation
//!
//! A **type-safe** simulated payment-processing client. It accepts payment
//! requests, validates them, throttles callers with a sliding-window rate
//! limiter, retries transient failures with exponential backoff and returns
//! synthesized payment responses. No network traffic is ever sent.
//!
//! ## Features
//!
//! - **Validation**: Amount, currency, upper limit and customer email checks
//! - **Rate limiting**: Per-operation sliding windows shared by every clone of a client
//! - **Retries**: Exponential backoff (`backoff_ms * 2^attempt`) for transient failures
//! - **Simulation**: Injectable latency, failures and statuses through the `Outcomes` trait
//! - **Storage**: Optional record stores for settled payments (in-memory, Redis)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_xpayments::{
//!     types::{Customer, PaymentRequest},
//!     Mode, PaymentConfig, XPayments,
//! };
//! use std::str::FromStr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PaymentConfig::new("test_key_123", Mode::Test)
//!         .with_retry(2, 100)
//!         .with_rate_limit(10, 1000);
//!     let client = XPayments::init(config)?;
//!
//!     let request = PaymentRequest::new(rust_decimal::Decimal::from_str("99.99")?, "USD")
//!         .with_description("Test payment")
//!         .with_customer(Customer::with_email("test@example.com"));
//!
//!     let payment = client.create_payment(&request).await?;
//!     println!("Created {} ({})", payment.id, payment.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`types`**: Requests, responses and constants
//! - **`config`**: Client configuration and retry/rate-limit policies
//! - **`error`**: Error kinds and codes
//! - **`validation`**: Request validation
//! - **`rate_limit`**: Sliding-window rate limiter
//! - **`retry`**: Exponential-backoff retry driver
//! - **`simulator`**: Simulated processor and payment ids
//! - **`client`**: The `XPayments` client tying the pieces together
//! - **`storage`**: Record stores for settled payments
//! - **`testing`**: Test-mode harness
//!
//! ## Optional Features
//!
//! ```toml
//! [dependencies]
//! rust-xpayments = { version = "0.1", features = ["redis"] }
//! ```
//!
//! - **`redis`**: Enable the Redis-backed record store

pub mod client;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;
pub mod simulator;
pub mod storage;
pub mod testing;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use client::XPayments;
pub use config::{Environment, Mode, PaymentConfig, RateLimitPolicy, RetryPolicy};
pub use error::{ErrorCode, PaymentError, Result};
pub use types::*;

/// Current version of the xpayments library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
