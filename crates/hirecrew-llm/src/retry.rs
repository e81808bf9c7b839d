//! Retry logic with exponential backoff and jitter
//!
//! Wraps a single LLM request and retries it on quota-exhaustion errors,
//! waiting `initial_delay * multiplier^attempt + jitter` between attempts.
//! Non-retryable errors propagate after exactly one attempt.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry classification for a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry after the computed exponential delay.
    Retry,
    /// Retry, waiting at least this long (API-suggested delay).
    RetryAfter(Duration),
    /// Do not retry; propagate immediately.
    Fatal,
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Cap on the pre-jitter delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Upper bound of the uniform random jitter added to each delay
    pub jitter_max: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(120),
            backoff_multiplier: 2.0,
            jitter_max: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set initial delay
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set maximum delay
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set backoff multiplier
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the jitter upper bound (zero disables jitter)
    #[must_use]
    pub fn with_jitter_max(mut self, jitter: Duration) -> Self {
        self.jitter_max = jitter;
        self
    }

    /// Pre-jitter delay for a given attempt number (1-based).
    ///
    /// Strictly increasing until it reaches `max_delay`.
    fn base_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as f64) as u64)
    }

    /// Full delay for a given attempt number: exponential base plus jitter.
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let jitter_ms = self.jitter_max.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms))
        };
        self.base_delay(attempt) + jitter
    }
}

/// Error returned when all retry attempts are exhausted or a fatal error occurs
#[derive(Debug)]
pub struct RetryError<E> {
    /// The last error encountered
    pub last_error: E,
    /// Total number of attempts made
    pub attempts: u32,
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "operation failed after {} attempt(s): {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RetryError<E> {}

/// Execute an async operation, retrying on quota-exhaustion errors.
///
/// # Arguments
/// * `config` - Retry configuration
/// * `operation` - Async operation to attempt
/// * `classify` - Maps an error to a [`Backoff`] decision
///
/// A `Backoff::RetryAfter` hint raises the wait to at least the suggested
/// duration; `Backoff::Fatal` returns after the current attempt.
pub async fn retry_with_backoff<T, E, F, Fut, C>(
    config: &RetryConfig,
    mut operation: F,
    classify: C,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Backoff,
    E: std::fmt::Debug,
{
    let max_attempts = config.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                let decision = classify(&e);
                let should_retry =
                    attempt < max_attempts && !matches!(decision, Backoff::Fatal);

                if should_retry {
                    let mut delay = config.calculate_delay(attempt);
                    if let Backoff::RetryAfter(hint) = decision {
                        delay = delay.max(hint);
                    }
                    warn!(
                        attempt,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = ?e,
                        "rate limited, backing off before retry"
                    );
                    sleep(delay).await;
                } else {
                    debug!(attempt, error = ?e, "operation failed, no more retries");
                    return Err(RetryError {
                        last_error: e,
                        attempts: attempt,
                    });
                }
            }
        }
    }

    unreachable!("retry loop always returns from the error branch")
}
