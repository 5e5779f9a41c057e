//! Retry with exponential backoff
//!
//! Generic combinator for idempotent-intent network calls: attempt an
//! async operation up to a bounded number of times, doubling the delay
//! between attempts up to a cap, and surface the last error once the
//! attempts are exhausted. The combinator knows nothing about what it
//! retries.

use std::future::Future;
use std::time::Duration;

/// Default max attempts for a settlement sync
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default initial delay between attempts
const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Default delay ceiling
const DEFAULT_MAX_DELAY_MS: u64 = 5000;

/// Bounded exponential backoff configuration
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Ceiling for the doubled delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1` (0-based failed attempt):
    /// `min(base * 2^attempt, max_delay)`, no jitter
    fn delay_after(&self, attempt: u32) -> Duration {
        let doubled = self.base_delay.saturating_mul(1u32 << attempt.min(16));
        doubled.min(self.max_delay)
    }
}

/// Run `op` with bounded retry
///
/// On failure, sleeps per the policy and tries again; after the last
/// attempt the final error is returned to the caller. The operation is
/// run serially — there is never more than one attempt in flight.
pub async fn retry_with_backoff<F, Fut, T, E>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 0..max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 < max_attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Attempt failed, retrying: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!()
}
