//! Core types for the payment client
//!
//! This module defines the data structures exchanged with the simulated
//! processor: requests, responses, redacted instruments and the constants that
//! govern validation and response synthesis.
//!
//! # Architecture
//!
//! - [`payment`] - Request and response structures
//! - [`constants`] - Supported currencies, limits, operation keys and simulated values
//!
//! # Examples
//!
//! ```
//! use rust_xpayments::types::{Customer, PaymentMethod, PaymentMethodType, PaymentRequest};
//! use rust_decimal::Decimal;
//!
//! let request = PaymentRequest::new(Decimal::new(9999, 2), "USD")
//!     .with_description("Premium plan")
//!     .with_customer(Customer::with_email("test@example.com").named("Test User"))
//!     .with_payment_method(PaymentMethod::new(PaymentMethodType::Card));
//!
//! assert_eq!(request.amount, Some(Decimal::new(9999, 2)));
//! ```

pub mod constants;
pub mod payment;

// Re-export commonly used types
pub use constants::{currencies, limits, operations, simulated, TEST_API_KEY};
pub use payment::{
    Customer, CustomerAddress, Metadata, PaymentMethod, PaymentMethodType, PaymentRequest,
    PaymentResponse, PaymentStatus, RedactedPaymentMethod, ResponseError,
};
