//! Per-provider retry with exponential backoff.

use std::future::Future;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Bounded retry for a single provider.
///
/// Attempt `k` (0-based) that fails with a retryable error is followed by a
/// sleep of `base_delay * 2^k`, capped at `max_delay`. No sleep follows the
/// last attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }
}

/// Result of running an operation under a [`RetryPolicy`].
#[derive(Debug)]
pub struct Retried<T> {
    pub result: Result<T>,
    pub attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Same attempt budget, no sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as u64;
        let cap = self.max_delay.as_millis() as u64;
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(base.saturating_mul(factor).min(cap))
    }

    /// Delay before the next attempt, or `None` when the error is final or
    /// the budget is spent.
    pub fn should_retry(&self, attempt: u32, error: &Error) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts || !error.is_retryable() {
            return None;
        }
        Some(self.backoff(attempt))
    }

    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Retried<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            debug!(provider = label, attempt = attempt + 1, max = self.max_attempts, "attempt");
            match op(attempt).await {
                Ok(value) => {
                    return Retried {
                        result: Ok(value),
                        attempts: attempt + 1,
                    }
                }
                Err(e) => match self.should_retry(attempt, &e) {
                    Some(delay) => {
                        warn!(
                            provider = label,
                            attempt = attempt + 1,
                            error = %e,
                            wait_ms = delay.as_millis() as u64,
                            "attempt failed, backing off"
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        attempt += 1;
                    }
                    None => {
                        return Retried {
                            result: Err(e),
                            attempts: attempt + 1,
                        }
                    }
                },
            }
        }
    }
}
