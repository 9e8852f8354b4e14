//! Tests for the simulated processor

use super::*;
use crate::error::ErrorCode;
use crate::types::{
    Customer, Metadata, PaymentMethod, PaymentMethodType, PaymentRequest, TEST_API_KEY,
};
use serde_json::json;
use std::str::FromStr;
use tokio::time::Instant;

fn test_config() -> PaymentConfig {
    PaymentConfig::new(TEST_API_KEY, Mode::Test)
}

fn live_config() -> PaymentConfig {
    PaymentConfig::new("sk_live_abc", Mode::Live)
}

fn sample_request() -> PaymentRequest {
    let mut metadata = Metadata::new();
    metadata.insert("test".to_string(), json!(true));
    metadata.insert("orderId".to_string(), json!("test_123"));

    PaymentRequest::new(Decimal::from_str("99.99").unwrap(), "USD")
        .with_description("Test payment")
        .with_customer(Customer::with_email("test@example.com").named("Test User"))
        .with_metadata(metadata)
}

#[test]
fn test_failure_errors() {
    let codes: Vec<ErrorCode> = SimulatedFailure::ALL
        .iter()
        .map(|f| f.into_error().code())
        .collect();

    assert_eq!(
        codes,
        vec![
            ErrorCode::NetworkError,
            ErrorCode::CardDeclined,
            ErrorCode::InsufficientFunds,
            ErrorCode::InvalidCard,
            ErrorCode::ExpiredCard,
        ]
    );
    assert_eq!(
        SimulatedFailure::ExpiredCard.into_error().message(),
        "Card expired"
    );
}

#[test]
fn test_random_outcomes_never_fail_in_live_mode() {
    let outcomes = RandomOutcomes::new().with_test_failure_rate(1.0);
    for _ in 0..100 {
        assert_eq!(outcomes.failure(Mode::Live), None);
    }
}

#[test]
fn test_random_outcomes_always_fail_at_full_rate() {
    let outcomes = RandomOutcomes::new()
        .with_test_failure_rate(1.0)
        .with_failures(vec![SimulatedFailure::CardDeclined]);

    for _ in 0..20 {
        assert_eq!(
            outcomes.failure(Mode::Test),
            Some(SimulatedFailure::CardDeclined)
        );
    }
}

#[test]
fn test_random_outcomes_zero_rate() {
    let outcomes = RandomOutcomes::new().with_test_failure_rate(0.0);
    for _ in 0..100 {
        assert_eq!(outcomes.failure(Mode::Test), None);
    }
}

#[test]
fn test_random_latency_within_range() {
    let outcomes = RandomOutcomes::default();
    for _ in 0..200 {
        let latency = outcomes.latency();
        assert!(latency >= Duration::from_millis(500));
        assert!(latency < Duration::from_millis(1500));
    }
}

#[test]
fn test_random_status_is_reportable() {
    let outcomes = RandomOutcomes::default();
    for _ in 0..50 {
        assert!(matches!(
            outcomes.status(),
            PaymentStatus::Succeeded | PaymentStatus::Processing | PaymentStatus::Pending
        ));
    }
}

#[test]
fn test_synthesize_payment_echoes_request() {
    let request = sample_request();
    let response = synthesize_payment(&request);

    assert!(response.id.starts_with("pay_"));
    assert_eq!(response.status, PaymentStatus::Succeeded);
    assert_eq!(Some(response.amount), request.amount);
    assert_eq!(response.currency, request.currency);
    assert_eq!(response.description, request.description);
    assert_eq!(response.metadata, request.metadata);
    assert_eq!(response.customer, request.customer);
    assert_eq!(response.created_at, response.updated_at);
    assert!(response.payment_method.is_none());
    assert!(response.error.is_none());
}

#[test]
fn test_synthesize_payment_redacts_method() {
    let mut data = Metadata::new();
    data.insert("number".to_string(), json!("4000056655665556"));
    let request = sample_request().with_payment_method(PaymentMethod {
        method_type: PaymentMethodType::Crypto,
        data: Some(data),
    });

    let method = synthesize_payment(&request).payment_method.unwrap();
    assert_eq!(method.method_type, PaymentMethodType::Crypto);
    assert_eq!(method.last4.as_deref(), Some("4242"));
    assert_eq!(method.brand.as_deref(), Some("visa"));
}

#[test]
fn test_synthesize_status_is_stateless() {
    let response = synthesize_status("pay_abc", PaymentStatus::Processing);

    assert_eq!(response.id, "pay_abc");
    assert_eq!(response.status, PaymentStatus::Processing);
    assert_eq!(response.amount, Decimal::ZERO);
    assert_eq!(response.currency, "USD");
    assert!(response.customer.is_none());
}

#[test]
fn test_check_payment_id() {
    assert!(check_payment_id("pay_abc").is_ok());
    assert_eq!(
        check_payment_id("bad_id").unwrap_err().code(),
        ErrorCode::ProcessingError
    );
    assert!(check_payment_id("PAY_abc").is_err());
}

#[tokio::test(start_paused = true)]
async fn test_attempt_payment_waits_for_latency() {
    let simulator = PaymentSimulator::new(Arc::new(
        FixedOutcomes::new().with_latency(Duration::from_millis(750)),
    ));
    let start = Instant::now();

    let response = simulator
        .attempt_payment(&test_config(), &sample_request())
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(750));
    assert!(response.is_succeeded());
}

#[tokio::test(start_paused = true)]
async fn test_attempt_payment_validates_before_injecting() {
    let simulator = PaymentSimulator::new(Arc::new(
        FixedOutcomes::new().with_failure(SimulatedFailure::NetworkError),
    ));
    let mut request = sample_request();
    request.currency = "XXX".to_string();

    let err = simulator
        .attempt_payment(&live_config(), &request)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCurrency);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_payment_injects_failure() {
    let simulator = PaymentSimulator::new(Arc::new(
        FixedOutcomes::new().with_failure(SimulatedFailure::InsufficientFunds),
    ));

    let err = simulator
        .attempt_payment(&test_config(), &sample_request())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientFunds);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_status() {
    let simulator = PaymentSimulator::new(Arc::new(
        FixedOutcomes::new().with_status(PaymentStatus::Pending),
    ));

    let response = simulator
        .attempt_status(&live_config(), "pay_123")
        .await
        .unwrap();
    assert_eq!(response.status, PaymentStatus::Pending);

    let err = simulator
        .attempt_status(&live_config(), "txn_123")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProcessingError);
}
