//! Error types for the payment client
//!
//! Every failing operation yields exactly one [`PaymentError`]. The taxonomy is
//! flat: one variant per failure cause, each carrying a human-readable message.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for payment operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// API key missing or not accepted for the configured mode
    #[error("{message}")]
    InvalidApiKey { message: String },

    /// Amount absent, zero or negative
    #[error("{message}")]
    InvalidAmount { message: String },

    /// Currency outside the supported set
    #[error("{message}")]
    InvalidCurrency { message: String },

    /// Amount above the per-payment ceiling
    #[error("{message}")]
    AmountTooLarge { message: String },

    /// Card rejected as invalid; also used for a malformed customer email
    #[error("{message}")]
    InvalidCard { message: String },

    /// Admission denied by the rate limiter
    #[error("{message}")]
    RateLimited { message: String },

    /// Simulated transport failure
    #[error("{message}")]
    NetworkError { message: String },

    /// Simulated issuer decline
    #[error("{message}")]
    CardDeclined { message: String },

    /// Simulated insufficient balance
    #[error("{message}")]
    InsufficientFunds { message: String },

    /// Simulated expired card
    #[error("{message}")]
    ExpiredCard { message: String },

    /// Processor could not handle the request
    #[error("{message}")]
    ProcessingError { message: String },
}

/// Machine-readable error code, serialized the way the processor reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidApiKey,
    InvalidAmount,
    InvalidCurrency,
    AmountTooLarge,
    InvalidCard,
    RateLimited,
    NetworkError,
    CardDeclined,
    InsufficientFunds,
    ExpiredCard,
    ProcessingError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidApiKey => "INVALID_API_KEY",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InvalidCurrency => "INVALID_CURRENCY",
            ErrorCode::AmountTooLarge => "AMOUNT_TOO_LARGE",
            ErrorCode::InvalidCard => "INVALID_CARD",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::CardDeclined => "CARD_DECLINED",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::ExpiredCard => "EXPIRED_CARD",
            ErrorCode::ProcessingError => "PROCESSING_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PaymentError {
    /// Create an invalid API key error
    pub fn invalid_api_key(message: impl Into<String>) -> Self {
        Self::InvalidApiKey {
            message: message.into(),
        }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Create an invalid currency error
    pub fn invalid_currency(message: impl Into<String>) -> Self {
        Self::InvalidCurrency {
            message: message.into(),
        }
    }

    /// Create an amount too large error
    pub fn amount_too_large(message: impl Into<String>) -> Self {
        Self::AmountTooLarge {
            message: message.into(),
        }
    }

    /// Create an invalid card error
    pub fn invalid_card(message: impl Into<String>) -> Self {
        Self::InvalidCard {
            message: message.into(),
        }
    }

    /// Create a rate limited error
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Create a card declined error
    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::CardDeclined {
            message: message.into(),
        }
    }

    /// Create an insufficient funds error
    pub fn insufficient_funds(message: impl Into<String>) -> Self {
        Self::InsufficientFunds {
            message: message.into(),
        }
    }

    /// Create an expired card error
    pub fn expired_card(message: impl Into<String>) -> Self {
        Self::ExpiredCard {
            message: message.into(),
        }
    }

    /// Create a processing error
    pub fn processing_error(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidApiKey { .. } => ErrorCode::InvalidApiKey,
            Self::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            Self::InvalidCurrency { .. } => ErrorCode::InvalidCurrency,
            Self::AmountTooLarge { .. } => ErrorCode::AmountTooLarge,
            Self::InvalidCard { .. } => ErrorCode::InvalidCard,
            Self::RateLimited { .. } => ErrorCode::RateLimited,
            Self::NetworkError { .. } => ErrorCode::NetworkError,
            Self::CardDeclined { .. } => ErrorCode::CardDeclined,
            Self::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            Self::ExpiredCard { .. } => ErrorCode::ExpiredCard,
            Self::ProcessingError { .. } => ErrorCode::ProcessingError,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidApiKey { message }
            | Self::InvalidAmount { message }
            | Self::InvalidCurrency { message }
            | Self::AmountTooLarge { message }
            | Self::InvalidCard { message }
            | Self::RateLimited { message }
            | Self::NetworkError { message }
            | Self::CardDeclined { message }
            | Self::InsufficientFunds { message }
            | Self::ExpiredCard { message }
            | Self::ProcessingError { message } => message,
        }
    }

    /// Whether the error kind can be produced by the simulated processor as a
    /// transient failure
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. }
                | Self::CardDeclined { .. }
                | Self::InsufficientFunds { .. }
                | Self::InvalidCard { .. }
                | Self::ExpiredCard { .. }
        )
    }
}
