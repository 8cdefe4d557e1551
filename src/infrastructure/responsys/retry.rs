use super::errors::RsysApiError;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Try-request policy: how many attempts, how long to wait between them,
/// and which status codes count as success
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts made for an API call before giving up
    times_to_try: u32,
    /// Wait before the second attempt in milliseconds
    initial_backoff_ms: u64,
    /// Maximum wait between attempts in milliseconds
    max_backoff_ms: u64,
    /// Status codes accepted as success
    target_status_codes: Vec<u16>,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Arguments
    /// * `times_to_try` - Total attempts (at least one attempt is always made)
    /// * `initial_backoff_ms` - Wait after the first failure; doubles per attempt
    /// * `max_backoff_ms` - Cap on the wait (equal to the initial wait gives a fixed delay)
    /// * `target_status_codes` - Statuses accepted as success (empty means `[200]`)
    ///
    /// # Example
    /// ```
    /// use rsys::infrastructure::responsys::retry::RetryPolicy;
    ///
    /// // Three attempts, a fixed 30 second wait, only 200 is accepted
    /// let policy = RetryPolicy::new(3, 30_000, 30_000, vec![200]);
    /// assert_eq!(policy.times_to_try(), 3);
    /// ```
    pub fn new(
        times_to_try: u32,
        initial_backoff_ms: u64,
        max_backoff_ms: u64,
        target_status_codes: Vec<u16>,
    ) -> Self {
        let target_status_codes = if target_status_codes.is_empty() {
            vec![200]
        } else {
            target_status_codes
        };

        Self {
            times_to_try: times_to_try.max(1),
            initial_backoff_ms,
            max_backoff_ms: max_backoff_ms.max(initial_backoff_ms),
            target_status_codes,
        }
    }

    /// Total attempts this policy makes
    pub const fn times_to_try(&self) -> u32 {
        self.times_to_try
    }

    /// Whether `status` counts as a successful response
    pub fn accepts(&self, status: StatusCode) -> bool {
        self.target_status_codes.contains(&status.as_u16())
    }

    /// Execute an operation until it succeeds, fails permanently, or the
    /// attempts run out
    ///
    /// # Returns
    /// * `Ok(T)` - Operation succeeded
    /// * `Err(RsysApiError)` - The permanent error as-is, or
    ///   `RetriesExhausted` wrapping the last transient error
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, RsysApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RsysApiError>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Request succeeded on attempt {}", attempt);
                    }
                    return Ok(result);
                }
                Err(err) if err.is_permanent() => {
                    debug!("Permanent error, not retrying: {}", err);
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        "Attempt {}/{} failed: {}",
                        attempt, self.times_to_try, err
                    );

                    if attempt >= self.times_to_try {
                        error!("Failed request {} times, giving up", attempt);
                        return Err(RsysApiError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }

                    let backoff = self.calculate_backoff(attempt - 1);
                    warn!("Waiting {:?} before next request attempt", backoff);
                    sleep(backoff).await;
                }
            }
        }
    }

    /// Wait after the given failed attempt (0-indexed):
    /// min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }
}

impl Default for RetryPolicy {
    /// Three attempts, fixed 30 second wait, success on 200 only
    fn default() -> Self {
        Self::new(3, 30_000, 30_000, vec![200])
    }
}
