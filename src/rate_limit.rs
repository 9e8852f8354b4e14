//! Sliding-window rate limiter keyed by operation name
//!
//! Each key keeps the instants of its admitted attempts. On every check the
//! instants that fell out of the window are evicted, so the window boundary is
//! relative to the current call rather than aligned to fixed buckets.

use crate::config::RateLimitPolicy;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Shared admission state for all operations of a client
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
}

impl RateLimiter {
    /// Create an empty rate limiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one attempt for `key` if the window has room, recording it
    ///
    /// Returns `false` without recording anything when the window is full.
    /// The check and the record happen under one lock, so concurrent callers
    /// can never exceed `policy.max_attempts` within a window.
    pub async fn check_and_record(&self, key: &str, policy: &RateLimitPolicy) -> bool {
        let now = Instant::now();
        let window = policy.window();

        let mut windows = self.windows.lock().await;
        let attempts = windows.entry(key.to_string()).or_default();

        while let Some(oldest) = attempts.front() {
            if now.duration_since(*oldest) >= window {
                attempts.pop_front();
            } else {
                break;
            }
        }

        if attempts.len() >= policy.max_attempts as usize {
            return false;
        }

        attempts.push_back(now);
        true
    }

    /// Number of attempts recorded for `key`, including ones not yet evicted
    pub async fn usage(&self, key: &str) -> usize {
        let windows = self.windows.lock().await;
        windows.get(key).map(VecDeque::len).unwrap_or(0)
    }

    /// Forget every recorded attempt
    pub async fn reset(&self) {
        let mut windows = self.windows.lock().await;
        windows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy() -> RateLimitPolicy {
        RateLimitPolicy::new(10, 1000)
    }

    #[tokio::test(start_paused = true)]
    async fn test_admits_up_to_max_attempts() {
        let limiter = RateLimiter::new();

        for i in 0..10 {
            assert!(
                limiter.check_and_record("create_payment", &policy()).await,
                "attempt {} should be admitted",
                i + 1
            );
        }

        assert!(!limiter.check_and_record("create_payment", &policy()).await);
        // Denied attempts are not recorded
        assert_eq!(limiter.usage("create_payment").await, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = RateLimiter::new();

        for _ in 0..5 {
            assert!(limiter.check_and_record("get_status", &policy()).await);
        }
        tokio::time::advance(Duration::from_millis(600)).await;
        for _ in 0..5 {
            assert!(limiter.check_and_record("get_status", &policy()).await);
        }
        assert!(!limiter.check_and_record("get_status", &policy()).await);

        // First five expire, the later five are still inside the window
        tokio::time::advance(Duration::from_millis(400)).await;
        for _ in 0..5 {
            assert!(limiter.check_and_record("get_status", &policy()).await);
        }
        assert!(!limiter.check_and_record("get_status", &policy()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_admits_again_after_window_elapses() {
        let limiter = RateLimiter::new();

        for _ in 0..10 {
            assert!(limiter.check_and_record("create_payment", &policy()).await);
        }
        assert!(!limiter.check_and_record("create_payment", &policy()).await);

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert!(limiter.check_and_record("create_payment", &policy()).await);
        assert_eq!(limiter.usage("create_payment").await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        let tight = RateLimitPolicy::new(1, 1000);

        assert!(limiter.check_and_record("create_payment", &tight).await);
        assert!(!limiter.check_and_record("create_payment", &tight).await);
        assert!(limiter.check_and_record("get_status", &tight).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_state() {
        let limiter = RateLimiter::new();
        let tight = RateLimitPolicy::new(1, 60_000);

        assert!(limiter.check_and_record("create_payment", &tight).await);
        assert!(!limiter.check_and_record("create_payment", &tight).await);

        limiter.reset().await;
        assert_eq!(limiter.usage("create_payment").await, 0);
        assert!(limiter.check_and_record("create_payment", &tight).await);
    }

    #[tokio::test]
    async fn test_concurrent_admission_never_exceeds_limit() {
        let limiter = RateLimiter::new();
        let policy = RateLimitPolicy::new(10, 60_000);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.check_and_record("create_payment", &policy).await })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 10);
    }
}
