//! Request validation
//!
//! Rules are checked in a fixed order and the first violation is reported:
//! amount, currency, amount ceiling, customer email.

use crate::types::{currencies, limits, PaymentRequest};
use crate::{PaymentError, Result};
use rust_decimal::Decimal;

/// Validate a payment request before any simulated I/O
pub fn validate(request: &PaymentRequest) -> Result<()> {
    let amount = match request.amount {
        Some(amount) if amount > Decimal::ZERO => amount,
        _ => return Err(PaymentError::invalid_amount("Invalid amount")),
    };

    if !currencies::is_supported(&request.currency) {
        return Err(PaymentError::invalid_currency("Invalid currency"));
    }

    if amount > limits::max_amount() {
        return Err(PaymentError::amount_too_large(
            "Amount exceeds maximum limit",
        ));
    }

    if let Some(email) = request.customer.as_ref().and_then(|c| c.email.as_deref()) {
        // An empty email counts as absent
        if !email.is_empty() && !is_valid_email(email) {
            return Err(PaymentError::invalid_card("Invalid email address"));
        }
    }

    Ok(())
}

/// Loose email shape check: `local@domain.tld`, no whitespace, a single `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Needs a non-empty label on both sides of some dot in the domain
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::types::Customer;
    use std::str::FromStr;

    fn request(amount: &str, currency: &str) -> PaymentRequest {
        PaymentRequest::new(Decimal::from_str(amount).unwrap(), currency)
    }

    fn code_of(request: &PaymentRequest) -> ErrorCode {
        validate(request).unwrap_err().code()
    }

    #[test]
    fn test_valid_request() {
        let req = request("99.99", "USD").with_customer(Customer::with_email("test@example.com"));
        assert!(validate(&req).is_ok());
        assert!(validate(&request("99999.99", "GBP")).is_ok());
        assert!(validate(&request("0.01", "EUR")).is_ok());
    }

    #[test]
    fn test_invalid_amounts() {
        assert_eq!(code_of(&request("0", "USD")), ErrorCode::InvalidAmount);
        assert_eq!(code_of(&request("-10", "USD")), ErrorCode::InvalidAmount);

        let mut missing = request("1", "USD");
        missing.amount = None;
        assert_eq!(code_of(&missing), ErrorCode::InvalidAmount);
    }

    #[test]
    fn test_currency_is_case_sensitive() {
        assert_eq!(code_of(&request("10", "XXX")), ErrorCode::InvalidCurrency);
        assert_eq!(code_of(&request("10", "usd")), ErrorCode::InvalidCurrency);
        assert_eq!(code_of(&request("10", "")), ErrorCode::InvalidCurrency);
    }

    #[test]
    fn test_amount_ceiling() {
        assert_eq!(code_of(&request("100000", "USD")), ErrorCode::AmountTooLarge);
        assert_eq!(
            code_of(&request("99999.991", "USD")),
            ErrorCode::AmountTooLarge
        );
    }

    #[test]
    fn test_invalid_email() {
        let req = request("10", "USD").with_customer(Customer::with_email("invalid-email"));
        let err = validate(&req).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCard);
        assert_eq!(err.message(), "Invalid email address");
    }

    #[test]
    fn test_rule_precedence() {
        // amount before currency
        assert_eq!(code_of(&request("-1", "XXX")), ErrorCode::InvalidAmount);
        // currency before ceiling
        assert_eq!(code_of(&request("100000", "XXX")), ErrorCode::InvalidCurrency);
        // ceiling before email
        let req = request("100000", "USD").with_customer(Customer::with_email("nope"));
        assert_eq!(code_of(&req), ErrorCode::AmountTooLarge);
        // everything wrong at once
        let req = request("0", "XXX").with_customer(Customer::with_email("nope"));
        assert_eq!(code_of(&req), ErrorCode::InvalidAmount);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }
}
