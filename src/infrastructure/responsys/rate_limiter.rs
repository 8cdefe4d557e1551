use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Token bucket rate limiter keeping the client under the account's
/// API throttle
///
/// Every request attempt takes one token. Tokens refill continuously at
/// `refill_rate` per second up to `capacity`.
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    state: Arc<Mutex<BucketState>>,
    /// Maximum token capacity (burst size)
    capacity: f64,
    /// Tokens added per second
    refill_rate: f64,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucketRateLimiter {
    /// Create a new rate limiter starting with a full bucket
    ///
    /// # Arguments
    /// * `requests_per_second` - Sustained request rate (non-positive values fall back to 1.0)
    /// * `burst_size` - Requests allowed back to back (at least 1)
    ///
    /// # Example
    /// ```
    /// use rsys::infrastructure::responsys::rate_limiter::TokenBucketRateLimiter;
    ///
    /// let rate_limiter = TokenBucketRateLimiter::new(5.0, 5);
    /// ```
    pub fn new(requests_per_second: f64, burst_size: u32) -> Self {
        let refill_rate = if requests_per_second > 0.0 {
            requests_per_second
        } else {
            1.0
        };
        let capacity = f64::from(burst_size.max(1));

        Self {
            state: Arc::new(Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            })),
            capacity,
            refill_rate,
        }
    }

    /// Acquire a token from the bucket, waiting if necessary
    pub async fn acquire(&self) {
        loop {
            let mut state = self.state.lock().await;

            let now = Instant::now();
            let elapsed = now.duration_since(state.last_refill).as_secs_f64();
            let new_tokens = (state.tokens + elapsed * self.refill_rate).min(self.capacity);

            if new_tokens >= 1.0 {
                state.tokens = new_tokens - 1.0;
                state.last_refill = now;
                return;
            }

            let tokens_needed = 1.0 - new_tokens;
            let wait_duration =
                Duration::from_secs_f64((tokens_needed / self.refill_rate).max(0.01));

            // Release the lock before sleeping
            drop(state);
            sleep(wait_duration).await;
        }
    }

    /// Current number of available tokens (for testing/monitoring)
    pub async fn available_tokens(&self) -> f64 {
        let state = self.state.lock().await;
        let elapsed = Instant::now().duration_since(state.last_refill).as_secs_f64();
        (state.tokens + elapsed * self.refill_rate).min(self.capacity)
    }
}
