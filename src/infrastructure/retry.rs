//! Bounded retries with exponential backoff for model backend calls

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::domain::models::RetryConfig;
use crate::domain::ports::ProviderError;

/// Retry policy for embedding and synthesis calls
///
/// Every attempt runs under `call_timeout`; an attempt that exceeds it is
/// abandoned and reported as [`ProviderError::Timeout`]. Only transient
/// errors are retried. Backoff doubles per attempt up to `max_backoff_ms`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
    call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Create a policy with explicit limits
    pub const fn new(
        max_retries: u32,
        initial_backoff_ms: u64,
        max_backoff_ms: u64,
        call_timeout: Duration,
    ) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
            call_timeout,
        }
    }

    /// Build the policy from the `retry` config section
    pub const fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
            Duration::from_secs(config.call_timeout_secs),
        )
    }

    /// A single attempt with no retries, still bounded by `call_timeout`
    pub const fn no_retry(call_timeout: Duration) -> Self {
        Self::new(0, 0, 0, call_timeout)
    }

    /// Maximum retries after the first attempt
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Deadline applied to each attempt
    pub const fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Run `operation` until it succeeds, fails permanently, or retries run out
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;

        loop {
            let outcome = match timeout(self.call_timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.call_timeout.as_secs())),
            };

            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt, "call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if self.should_retry(&err, attempt) => {
                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        error = %err,
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        "transient provider error, retrying"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        warn!(attempts = attempt + 1, error = %err, "giving up after retries");
                    } else {
                        debug!(error = %err, "permanent provider error, not retrying");
                    }
                    return Err(err);
                }
            }
        }
    }

    const fn should_retry(&self, error: &ProviderError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_transient()
    }

    /// `min(initial * 2^attempt, max)`
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.checked_pow(attempt).unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}
