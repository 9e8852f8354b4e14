//! Test-mode harness
//!
//! Helpers for exercising a client end to end: a ready-made test
//! configuration, a representative request, and probes that run fixed
//! scenarios and report what happened as serializable [`ScenarioOutcome`]s.
//!
//! # Examples
//!
//! ```no_run
//! use rust_xpayments::testing::{run_scenarios, test_mode_config};
//! use rust_xpayments::XPayments;
//!
//! # async fn example() -> rust_xpayments::Result<()> {
//! let client = XPayments::init(test_mode_config(true))?;
//! for outcome in run_scenarios(&client).await {
//!     println!("{}: {}", outcome.scenario, outcome.success);
//! }
//! # Ok(())
//! # }
//! ```

use crate::client::XPayments;
use crate::config::{Mode, PaymentConfig};
use crate::error::ErrorCode;
use crate::types::{Customer, Metadata, PaymentRequest, PaymentResponse, TEST_API_KEY};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

/// Result of one harness call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    /// 1-based position within a probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    pub success: bool,
    /// Error the scenario is designed to provoke, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<PaymentResponse>,
}

impl ScenarioOutcome {
    fn record(scenario: impl Into<String>, result: crate::Result<PaymentResponse>) -> Self {
        let (success, error, response) = match result {
            Ok(response) => (true, None, Some(response)),
            Err(err) => (false, Some(err.code()), None),
        };

        Self {
            scenario: scenario.into(),
            attempt: None,
            success,
            expected_error: None,
            error,
            response,
        }
    }

    fn expecting(mut self, expected: Option<ErrorCode>) -> Self {
        self.expected_error = expected;
        self
    }

    fn at(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Whether the call ended the way the scenario intended
    pub fn met_expectation(&self) -> bool {
        match self.expected_error {
            Some(code) => self.error == Some(code),
            None => self.success,
        }
    }
}

/// Test-mode configuration with short retry and rate-limit windows
pub fn test_mode_config(debug: bool) -> PaymentConfig {
    PaymentConfig::new(TEST_API_KEY, Mode::Test)
        .with_debug(debug)
        .with_retry(2, 100)
        .with_rate_limit(10, 1000)
}

/// A valid 99.99 USD request with a customer and metadata
pub fn sample_request() -> PaymentRequest {
    let mut metadata = Metadata::new();
    metadata.insert("test".to_string(), json!(true));
    metadata.insert("orderId".to_string(), json!("test_123"));

    PaymentRequest::new(Decimal::new(9999, 2), "USD")
        .with_description("Test payment")
        .with_customer(Customer::with_email("test@example.com").named("Test User"))
        .with_metadata(metadata)
}

/// The fixed scenario set, paired with the error each should provoke
pub fn scenarios() -> Vec<(&'static str, PaymentRequest, Option<ErrorCode>)> {
    let mut negative = sample_request();
    negative.amount = Some(Decimal::from(-10));

    let mut unsupported = sample_request();
    unsupported.currency = "XXX".to_string();

    let mut too_large = sample_request();
    too_large.amount = Some(Decimal::from(100_000));

    let bad_email = sample_request()
        .with_customer(Customer::with_email("invalid-email").named("Test User"));

    vec![
        ("Successful payment", sample_request(), None),
        ("Invalid amount", negative, Some(ErrorCode::InvalidAmount)),
        ("Invalid currency", unsupported, Some(ErrorCode::InvalidCurrency)),
        ("Amount too large", too_large, Some(ErrorCode::AmountTooLarge)),
        ("Invalid email", bad_email, Some(ErrorCode::InvalidCard)),
    ]
}

/// Run every scenario once, in order
pub async fn run_scenarios(client: &XPayments) -> Vec<ScenarioOutcome> {
    let mut outcomes = Vec::new();
    for (name, request, expected) in scenarios() {
        let result = client.create_payment(&request).await;
        let outcome = ScenarioOutcome::record(name, result).expecting(expected);
        tracing::debug!(scenario = name, success = outcome.success, "Scenario finished");
        outcomes.push(outcome);
    }
    outcomes
}

/// Submit the sample request `count` times back to back
///
/// With the test configuration, calls past the tenth within a second come
/// back `RATE_LIMITED`.
pub async fn run_rate_limit_probe(client: &XPayments, count: u32) -> Vec<ScenarioOutcome> {
    let request = sample_request();
    let mut outcomes = Vec::with_capacity(count as usize);
    for attempt in 1..=count {
        let result = client.create_payment(&request).await;
        outcomes.push(ScenarioOutcome::record("Rate limit probe", result).at(attempt));
    }
    outcomes
}

/// Submit `count` fresh sample requests, relying on test-mode failure
/// injection to exercise the retry path
pub async fn run_retry_probe(client: &XPayments, count: u32) -> Vec<ScenarioOutcome> {
    let mut outcomes = Vec::with_capacity(count as usize);
    for attempt in 1..=count {
        let result = client.create_payment(&sample_request()).await;
        outcomes.push(ScenarioOutcome::record("Retry probe", result).at(attempt));
    }
    outcomes
}
