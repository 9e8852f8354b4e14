//! Bounded exponential-backoff retries

use crate::config::RetryPolicy;
use crate::Result;
use std::future::Future;
use std::time::Duration;

/// Delay after failed attempt `attempt` (0-based): `backoff_ms * 2^attempt`
pub fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    Duration::from_millis(policy.backoff_ms.saturating_mul(factor))
}

/// Run `operation` up to `policy.max_retries` times
///
/// The closure receives the 0-based attempt index. Between failed attempts the
/// task sleeps for [`backoff_delay`]. When every attempt fails, the error of the
/// last attempt is returned unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_retries = policy.max_retries.max(1);
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt + 1 >= max_retries {
                    tracing::warn!(
                        attempts = max_retries,
                        code = %e.code(),
                        "All attempts failed: {}",
                        e
                    );
                    return Err(e);
                }

                let delay = backoff_delay(policy, attempt);
                tracing::warn!(
                    "Attempt {} failed ({}), retrying after {:?}: {}",
                    attempt + 1,
                    e.code(),
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
