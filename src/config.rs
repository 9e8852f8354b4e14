//! Client configuration
//!
//! A [`PaymentConfig`] is validated and normalised once by
//! [`crate::XPayments::init`] and then shared read-only by every operation.

use crate::types::TEST_API_KEY;
use crate::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default number of attempts per operation
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base backoff in milliseconds
pub const DEFAULT_BACKOFF_MS: u64 = 1000;
/// Default admissions per window
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;
/// Default window length in milliseconds (15 minutes)
pub const DEFAULT_WINDOW_MS: u64 = 15 * 60 * 1000;

/// Processing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Sandbox keys only; injects random failures
    Test,
    Live,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Test => "test",
            Mode::Live => "live",
        }
    }
}

impl FromStr for Mode {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "test" => Ok(Mode::Test),
            "live" => Ok(Mode::Live),
            other => Err(PaymentError::invalid_api_key(format!(
                "Unknown mode '{}', expected 'test' or 'live'",
                other
            ))),
        }
    }
}

/// Target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(PaymentError::invalid_api_key(format!(
                "Unknown environment '{}', expected 'sandbox' or 'production'",
                other
            ))),
        }
    }
}

/// Bounded exponential-backoff retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    #[serde(rename = "maxRetries")]
    pub max_retries: u32,
    /// Base delay; attempt `i` waits `backoff_ms * 2^i` before the next one
    #[serde(rename = "backoffMs")]
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_ms: DEFAULT_BACKOFF_MS,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_ms,
        }
    }

    /// Base backoff as a duration
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Sliding-window admission policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    #[serde(rename = "maxAttempts")]
    pub max_attempts: u32,
    #[serde(rename = "windowMs")]
    pub window_ms: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window_ms: DEFAULT_WINDOW_MS,
        }
    }
}

impl RateLimitPolicy {
    pub fn new(max_attempts: u32, window_ms: u64) -> Self {
        Self {
            max_attempts,
            window_ms,
        }
    }

    /// Window length as a duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Configuration for the payment client
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub mode: Mode,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub debug: bool,
    /// Preferred display currency; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Preferred locale; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(rename = "retryConfig", default)]
    pub retry: RetryPolicy,
    #[serde(rename = "rateLimit", default)]
    pub rate_limit: RateLimitPolicy,
}

impl fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("api_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("environment", &self.environment)
            .field("debug", &self.debug)
            .field("currency", &self.currency)
            .field("locale", &self.locale)
            .field("retry", &self.retry)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl PaymentConfig {
    /// Create a new config with default environment and policies
    pub fn new(api_key: impl Into<String>, mode: Mode) -> Self {
        Self {
            api_key: api_key.into(),
            mode,
            environment: Environment::default(),
            debug: false,
            currency: None,
            locale: None,
            retry: RetryPolicy::default(),
            rate_limit: RateLimitPolicy::default(),
        }
    }

    /// Set the environment
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Enable or disable debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the preferred display currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the preferred locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, max_retries: u32, backoff_ms: u64) -> Self {
        self.retry = RetryPolicy::new(max_retries, backoff_ms);
        self
    }

    /// Set the rate-limit policy
    pub fn with_rate_limit(mut self, max_attempts: u32, window_ms: u64) -> Self {
        self.rate_limit = RateLimitPolicy::new(max_attempts, window_ms);
        self
    }

    /// Validate the API key against the configured mode
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(PaymentError::invalid_api_key("API key is required"));
        }

        if self.mode == Mode::Test && self.api_key != TEST_API_KEY {
            return Err(PaymentError::invalid_api_key("Invalid test API key"));
        }

        Ok(())
    }

    /// Validate and replace zero counts with their defaults
    pub fn normalized(mut self) -> Result<Self> {
        self.validate()?;

        if self.retry.max_retries == 0 {
            self.retry.max_retries = DEFAULT_MAX_RETRIES;
        }
        if self.rate_limit.max_attempts == 0 {
            self.rate_limit.max_attempts = DEFAULT_MAX_ATTEMPTS;
        }

        Ok(self)
    }

    /// Load the configuration from `XPAYMENTS_*` environment variables
    ///
    /// `XPAYMENTS_API_KEY` is required. Numeric values that fail to parse fall
    /// back to their defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("XPAYMENTS_API_KEY").map_err(|_| {
            PaymentError::invalid_api_key("XPAYMENTS_API_KEY environment variable is required")
        })?;

        let mode = match env::var("XPAYMENTS_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => Mode::Test,
        };

        let environment = match env::var("XPAYMENTS_ENVIRONMENT") {
            Ok(environment) => environment.parse()?,
            Err(_) => Environment::default(),
        };

        let debug = env::var("XPAYMENTS_DEBUG")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let retry = RetryPolicy {
            max_retries: parse_env("XPAYMENTS_MAX_RETRIES").unwrap_or(DEFAULT_MAX_RETRIES),
            backoff_ms: parse_env("XPAYMENTS_BACKOFF_MS").unwrap_or(DEFAULT_BACKOFF_MS),
        };

        let rate_limit = RateLimitPolicy {
            max_attempts: parse_env("XPAYMENTS_RATE_LIMIT_MAX_ATTEMPTS")
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            window_ms: parse_env("XPAYMENTS_RATE_LIMIT_WINDOW_MS").unwrap_or(DEFAULT_WINDOW_MS),
        };

        Ok(Self {
            api_key,
            mode,
            environment,
            debug,
            currency: env::var("XPAYMENTS_CURRENCY").ok(),
            locale: env::var("XPAYMENTS_LOCALE").ok(),
            retry,
            rate_limit,
        })
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config = PaymentConfig::new(TEST_API_KEY, Mode::Test);

        assert_eq!(config.environment, Environment::Sandbox);
        assert!(!config.debug);
        assert_eq!(config.retry, RetryPolicy::new(3, 1000));
        assert_eq!(config.rate_limit, RateLimitPolicy::new(100, 900_000));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = PaymentConfig::new("", Mode::Live).validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidApiKey);
        assert_eq!(err.message(), "API key is required");
    }

    #[test]
    fn test_test_mode_requires_sentinel_key() {
        let err = PaymentConfig::new("sk_live_abc", Mode::Test)
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidApiKey);

        assert!(PaymentConfig::new("sk_live_abc", Mode::Live).validate().is_ok());
        assert!(PaymentConfig::new(TEST_API_KEY, Mode::Test).validate().is_ok());
    }

    #[test]
    fn test_normalized_fills_zero_counts() {
        let config = PaymentConfig::new(TEST_API_KEY, Mode::Test)
            .with_retry(0, 0)
            .with_rate_limit(0, 0)
            .normalized()
            .unwrap();

        assert_eq!(config.retry.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.retry.backoff_ms, 0);
        assert_eq!(config.rate_limit.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.rate_limit.window_ms, 0);
    }

    #[test]
    fn test_config_deserialization_fills_unset_fields() {
        let config: PaymentConfig = serde_json::from_value(json!({
            "apiKey": "test_key_123",
            "mode": "test",
            "retryConfig": { "maxRetries": 2 },
            "rateLimit": { "windowMs": 1000 }
        }))
        .unwrap();

        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.retry, RetryPolicy::new(2, DEFAULT_BACKOFF_MS));
        assert_eq!(
            config.rate_limit,
            RateLimitPolicy::new(DEFAULT_MAX_ATTEMPTS, 1000)
        );
    }

    #[test]
    fn test_config_builder() {
        let config = PaymentConfig::new("sk_live_abc", Mode::Live)
            .with_environment(Environment::Production)
            .with_debug(true)
            .with_currency("EUR")
            .with_locale("en-GB")
            .with_retry(5, 250)
            .with_rate_limit(10, 1000);

        assert_eq!(config.environment, Environment::Production);
        assert!(config.debug);
        assert_eq!(config.currency, Some("EUR".to_string()));
        assert_eq!(config.locale, Some("en-GB".to_string()));
        assert_eq!(config.retry.backoff(), Duration::from_millis(250));
        assert_eq!(config.rate_limit.window(), Duration::from_secs(1));
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = PaymentConfig::new("sk_live_secret", Mode::Live);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk_live_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_mode_and_environment_parsing() {
        assert_eq!("live".parse::<Mode>().unwrap(), Mode::Live);
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
        assert!("TEST".parse::<Mode>().is_err());
    }

    #[test]
    fn test_from_env() {
        env::set_var("XPAYMENTS_API_KEY", "sk_live_env");
        env::set_var("XPAYMENTS_MODE", "live");
        env::set_var("XPAYMENTS_MAX_RETRIES", "7");
        env::set_var("XPAYMENTS_BACKOFF_MS", "not-a-number");

        let config = PaymentConfig::from_env().unwrap();
        assert_eq!(config.api_key, "sk_live_env");
        assert_eq!(config.mode, Mode::Live);
        assert_eq!(config.retry.max_retries, 7);
        assert_eq!(config.retry.backoff_ms, DEFAULT_BACKOFF_MS);

        env::remove_var("XPAYMENTS_API_KEY");
        env::remove_var("XPAYMENTS_MODE");
        env::remove_var("XPAYMENTS_MAX_RETRIES");
        env::remove_var("XPAYMENTS_BACKOFF_MS");

        assert!(PaymentConfig::from_env().is_err());
    }
}
