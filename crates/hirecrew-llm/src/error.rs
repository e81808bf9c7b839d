//! Error types for hirecrew-llm

use crate::retry::Backoff;
use std::time::Duration;
use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider not configured (missing API key)
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Authentication rejected by the API (401/403)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Rate limit / quota exhausted (429, RESOURCE_EXHAUSTED)
    #[error("rate limit exceeded")]
    RateLimit {
        /// Seconds until retry is allowed, when the API supplied a hint
        retry_after: Option<u64>,
    },

    /// Server-side error (5xx)
    #[error("server error: {0}")]
    ServerError(String),

    /// Any other API error
    #[error("api error: {0}")]
    Api(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Whether the error is a quota-exhaustion error worth retrying.
    ///
    /// Only rate limits are retried; everything else propagates after a
    /// single attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }

    /// Retry classification for [`retry_with_backoff`](crate::retry_with_backoff).
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        match self {
            Self::RateLimit {
                retry_after: Some(secs),
            } => Backoff::RetryAfter(Duration::from_secs(*secs)),
            Self::RateLimit { retry_after: None } => Backoff::Retry,
            _ => Backoff::Fatal,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
