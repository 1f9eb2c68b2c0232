//! Bounded retry with exponential backoff for calls against unreliable services.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Strictly sequential retries: no concurrency, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy always makes at least one attempt.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Backoff after the failed attempt with 0-based index `attempt_index`:
    /// `base_delay * 2^attempt_index`.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt_index))
    }

    /// Runs `operation` until it succeeds, `max_attempts` is used up, or it fails
    /// with an error `retryable` rejects.
    ///
    /// Each failure is logged with its attempt number. Between attempts the task
    /// sleeps for `delay_for(attempt_index)`. After the final failure the last
    /// error is returned unchanged; nothing is swallowed.
    pub async fn execute<T, E, F, Fut, R>(&self, mut operation: F, retryable: R) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        R: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt_index = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed: {}",
                        attempt_index + 1,
                        max_attempts,
                        e
                    );

                    if attempt_index + 1 >= max_attempts || !retryable(&e) {
                        return Err(e);
                    }

                    tokio::time::sleep(self.delay_for(attempt_index)).await;
                    attempt_index += 1;
                }
            }
        }
    }
}
