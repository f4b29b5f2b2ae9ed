/*!
 * Retry policy for provider calls.
 *
 * The backoff schedule is exponential: the wait after the n-th failed
 * attempt is `multiplier * 2^(n-1)` seconds, clamped into
 * `[min_backoff, max_backoff]`. With the defaults (3 attempts, multiplier
 * 1, floor 1s, ceiling 10s) that is 1s then 2s.
 */

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Explicit retry policy around a single fallible async operation
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Multiplier applied to the exponential schedule, in seconds
    pub multiplier: f64,
    /// Lower bound for any wait
    pub min_backoff: Duration,
    /// Upper bound for any wait
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy with the default schedule and the given attempt budget
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            multiplier: 1.0,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        }
    }

    /// A single attempt, never retried
    pub fn none() -> Self {
        Self::new(1)
    }

    /// Set the backoff multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the backoff floor and ceiling
    pub fn with_backoff_bounds(mut self, min_backoff: Duration, max_backoff: Duration) -> Self {
        self.min_backoff = min_backoff;
        self.max_backoff = max_backoff.max(min_backoff);
        self
    }

    /// Wait before the retry that follows failed attempt `failed_attempt` (1-based)
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1).min(62) as i32;
        let secs = (self.multiplier * 2f64.powi(exponent)).max(0.0);
        let raw = Duration::try_from_secs_f64(secs).unwrap_or(self.max_backoff);
        raw.clamp(self.min_backoff, self.max_backoff)
    }

    /// Run `operation`, retrying the errors `should_retry` accepts
    ///
    /// Errors rejected by the predicate are returned immediately. When the
    /// attempt budget runs out the last error is returned.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        operation_name: &str,
        mut operation: F,
        should_retry: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("{}: succeeded on attempt {}/{}", operation_name, attempt, max_attempts);
                    }
                    return Ok(result);
                }
                Err(e) if !should_retry(&e) => {
                    debug!("{}: error is not retryable: {}", operation_name, e);
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    warn!("{}: all {} attempts failed, last error: {}", operation_name, max_attempts, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {:?}",
                        operation_name, attempt, max_attempts, e, delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
