//! Simulated payment processor
//!
//! The simulator stands in for a remote processor. Every attempt waits for a
//! simulated network latency, may fail with an injected transient error and
//! otherwise synthesizes a response.
//!
//! All randomness goes through the [`Outcomes`] trait so that callers and tests
//! can swap the default [`RandomOutcomes`] for a deterministic source such as
//! [`FixedOutcomes`].
//!
//! # Examples
//!
//! ```
//! use rust_xpayments::simulator::{FixedOutcomes, SimulatedFailure};
//! use rust_xpayments::types::PaymentStatus;
//! use std::time::Duration;
//!
//! // Every attempt takes 10ms and is declined
//! let outcomes = FixedOutcomes::new()
//!     .with_latency(Duration::from_millis(10))
//!     .with_failure(SimulatedFailure::CardDeclined)
//!     .with_status(PaymentStatus::Pending);
//! ```

use crate::config::{Mode, PaymentConfig};
use crate::types::{
    simulated, PaymentRequest, PaymentResponse, PaymentStatus, RedactedPaymentMethod,
};
use crate::{validation, PaymentError, Result};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub mod ids;

#[cfg(test)]
mod tests;

pub use ids::generate_payment_id;

/// Transient failures the simulated processor can inject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulatedFailure {
    NetworkError,
    CardDeclined,
    InsufficientFunds,
    InvalidCard,
    ExpiredCard,
}

impl SimulatedFailure {
    /// Every failure kind, in the order the processor picks from
    pub const ALL: [SimulatedFailure; 5] = [
        SimulatedFailure::NetworkError,
        SimulatedFailure::CardDeclined,
        SimulatedFailure::InsufficientFunds,
        SimulatedFailure::InvalidCard,
        SimulatedFailure::ExpiredCard,
    ];

    /// The error surfaced for this failure
    pub fn into_error(self) -> PaymentError {
        match self {
            SimulatedFailure::NetworkError => PaymentError::network_error("Network error"),
            SimulatedFailure::CardDeclined => PaymentError::card_declined("Card declined"),
            SimulatedFailure::InsufficientFunds => {
                PaymentError::insufficient_funds("Insufficient funds")
            }
            SimulatedFailure::InvalidCard => PaymentError::invalid_card("Invalid card"),
            SimulatedFailure::ExpiredCard => PaymentError::expired_card("Card expired"),
        }
    }
}

/// Source of every non-deterministic decision the simulator makes
pub trait Outcomes: Send + Sync {
    /// Simulated network latency of one attempt
    fn latency(&self) -> Duration;

    /// Failure to inject into one payment attempt, if any
    fn failure(&self, mode: Mode) -> Option<SimulatedFailure>;

    /// Status reported by a status lookup
    fn status(&self) -> PaymentStatus;
}

/// Default outcome source backed by the thread-local RNG
#[derive(Debug, Clone)]
pub struct RandomOutcomes {
    /// Probability of an injected failure in test mode; live mode never fails
    pub test_failure_rate: f64,
    /// Failures to pick from, uniformly
    pub failures: Vec<SimulatedFailure>,
    /// Lower bound of the latency
    pub min_latency: Duration,
    /// Width of the latency range; latency is uniform in `[min, min + spread)`
    pub latency_spread: Duration,
    /// Statuses reported by lookups, uniformly
    pub statuses: Vec<PaymentStatus>,
}

impl Default for RandomOutcomes {
    fn default() -> Self {
        Self {
            test_failure_rate: simulated::TEST_MODE_FAILURE_RATE,
            failures: SimulatedFailure::ALL.to_vec(),
            min_latency: Duration::from_millis(simulated::MIN_LATENCY_MS),
            latency_spread: Duration::from_millis(simulated::LATENCY_SPREAD_MS),
            statuses: vec![
                PaymentStatus::Succeeded,
                PaymentStatus::Processing,
                PaymentStatus::Pending,
            ],
        }
    }
}

impl RandomOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the test-mode failure probability, clamped to `[0, 1]`
    pub fn with_test_failure_rate(mut self, rate: f64) -> Self {
        self.test_failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Set the latency range
    pub fn with_latency(mut self, min: Duration, spread: Duration) -> Self {
        self.min_latency = min;
        self.latency_spread = spread;
        self
    }

    /// Restrict the failures that can be injected
    pub fn with_failures(mut self, failures: Vec<SimulatedFailure>) -> Self {
        self.failures = failures;
        self
    }
}

impl Outcomes for RandomOutcomes {
    fn latency(&self) -> Duration {
        let spread = self.latency_spread.as_millis() as u64;
        if spread == 0 {
            return self.min_latency;
        }
        self.min_latency + Duration::from_millis(rand::thread_rng().gen_range(0..spread))
    }

    fn failure(&self, mode: Mode) -> Option<SimulatedFailure> {
        if mode != Mode::Test {
            return None;
        }

        let mut rng = rand::thread_rng();
        if rng.gen::<f64>() >= self.test_failure_rate {
            return None;
        }
        self.failures.choose(&mut rng).copied()
    }

    fn status(&self) -> PaymentStatus {
        self.statuses
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(PaymentStatus::Pending)
    }
}

/// Deterministic outcome source
#[derive(Debug, Clone, PartialEq)]
pub struct FixedOutcomes {
    pub latency: Duration,
    pub failure: Option<SimulatedFailure>,
    pub status: PaymentStatus,
}

impl Default for FixedOutcomes {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            failure: None,
            status: PaymentStatus::Succeeded,
        }
    }
}

impl FixedOutcomes {
    /// No latency, no failures, lookups report `succeeded`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Inject `failure` into every attempt, regardless of mode
    pub fn with_failure(mut self, failure: SimulatedFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }
}

impl Outcomes for FixedOutcomes {
    fn latency(&self) -> Duration {
        self.latency
    }

    fn failure(&self, _mode: Mode) -> Option<SimulatedFailure> {
        self.failure
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }
}

/// Runs single attempts against the simulated processor
#[derive(Clone)]
pub struct PaymentSimulator {
    outcomes: Arc<dyn Outcomes>,
}

impl fmt::Debug for PaymentSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentSimulator")
            .field("outcomes", &"<dyn Outcomes>")
            .finish()
    }
}

impl Default for PaymentSimulator {
    fn default() -> Self {
        Self::new(Arc::new(RandomOutcomes::default()))
    }
}

impl PaymentSimulator {
    /// Create a simulator driven by `outcomes`
    pub fn new(outcomes: Arc<dyn Outcomes>) -> Self {
        Self { outcomes }
    }

    /// Wait for one simulated network round trip
    pub async fn network_delay(&self, config: &PaymentConfig) {
        let delay = self.outcomes.latency();
        if config.debug {
            tracing::debug!("Simulating network delay of {:?}", delay);
        }
        tokio::time::sleep(delay).await;
    }

    /// One payment attempt: latency, validation, failure injection, synthesis
    pub async fn attempt_payment(
        &self,
        config: &PaymentConfig,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse> {
        self.network_delay(config).await;

        validation::validate(request)?;

        if let Some(failure) = self.outcomes.failure(config.mode) {
            if config.debug {
                tracing::debug!("Injecting simulated failure: {:?}", failure);
            }
            return Err(failure.into_error());
        }

        Ok(synthesize_payment(request))
    }

    /// One status attempt: latency, id check, status synthesis
    pub async fn attempt_status(
        &self,
        config: &PaymentConfig,
        payment_id: &str,
    ) -> Result<PaymentResponse> {
        self.network_delay(config).await;

        check_payment_id(payment_id)?;

        Ok(synthesize_status(payment_id, self.outcomes.status()))
    }
}

/// Reject ids the processor could not have issued
pub fn check_payment_id(payment_id: &str) -> Result<()> {
    if !payment_id.starts_with(simulated::PAYMENT_ID_PREFIX) {
        return Err(PaymentError::processing_error("Invalid payment ID"));
    }
    Ok(())
}

/// Build the settled response for an accepted request
pub fn synthesize_payment(request: &PaymentRequest) -> PaymentResponse {
    let now = Utc::now();

    PaymentResponse {
        id: generate_payment_id(),
        status: PaymentStatus::Succeeded,
        amount: request.amount.unwrap_or(Decimal::ZERO),
        currency: request.currency.clone(),
        description: request.description.clone(),
        created_at: now,
        updated_at: now,
        metadata: request.metadata.clone(),
        customer: request.customer.clone(),
        payment_method: request
            .payment_method
            .as_ref()
            .map(RedactedPaymentMethod::simulated),
        error: None,
    }
}

/// Build a status-lookup response; the simulator keeps no payment history
pub fn synthesize_status(payment_id: &str, status: PaymentStatus) -> PaymentResponse {
    let now = Utc::now();

    PaymentResponse {
        id: payment_id.to_string(),
        status,
        amount: Decimal::ZERO,
        currency: simulated::STATUS_CURRENCY.to_string(),
        description: None,
        created_at: now,
        updated_at: now,
        metadata: None,
        customer: None,
        payment_method: None,
        error: None,
    }
}
