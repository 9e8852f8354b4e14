//! Common constants for currencies, limits and simulated processor values

/// Supported settlement currencies
pub mod currencies {
    /// US dollar
    pub const USD: &str = "USD";
    /// Euro
    pub const EUR: &str = "EUR";
    /// Pound sterling
    pub const GBP: &str = "GBP";

    /// Check if a currency code is supported (case-sensitive)
    pub fn is_supported(currency: &str) -> bool {
        matches!(currency, USD | EUR | GBP)
    }

    /// Get all supported currencies
    pub fn all_supported() -> Vec<&'static str> {
        vec![USD, EUR, GBP]
    }
}

/// Per-payment limits
pub mod limits {
    use rust_decimal::Decimal;

    /// Largest accepted amount, 99999.99
    pub fn max_amount() -> Decimal {
        Decimal::new(9_999_999, 2)
    }
}

/// Operation keys used for rate-limit admission
pub mod operations {
    /// Payment creation
    pub const CREATE_PAYMENT: &str = "create_payment";
    /// Payment status lookup
    pub const GET_STATUS: &str = "get_status";
}

/// Values reported by the simulated processor
pub mod simulated {
    /// Prefix of every payment id
    pub const PAYMENT_ID_PREFIX: &str = "pay_";
    /// Last four digits reported for a redacted payment method
    pub const CARD_LAST4: &str = "4242";
    /// Card brand reported for a redacted payment method
    pub const CARD_BRAND: &str = "visa";
    /// Currency reported by the status endpoint
    pub const STATUS_CURRENCY: &str = "USD";
    /// Probability of an injected failure in test mode
    pub const TEST_MODE_FAILURE_RATE: f64 = 0.10;
    /// Lower bound of the simulated latency in milliseconds
    pub const MIN_LATENCY_MS: u64 = 500;
    /// Width of the simulated latency range in milliseconds
    pub const LATENCY_SPREAD_MS: u64 = 1000;
}

/// The only API key accepted in test mode
pub const TEST_API_KEY: &str = "test_key_123";
