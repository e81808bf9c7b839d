//! Application configuration
//!
//! All settings come from the environment (after `.env` loading in main).
//! `from_env` validates the required API keys up front so a missing key
//! fails immediately, before any network call is made.

use crate::error::{Error, Result};
use hirecrew_llm::RetryConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Base delay before the first retry
const BASE_REQUEST_DELAY: Duration = Duration::from_secs(5);
/// Cap on the exponential backoff delay
const MAX_REQUEST_DELAY: Duration = Duration::from_secs(120);
/// Maximum attempts per LLM call (including the first)
const MAX_RETRIES: u32 = 5;
/// Exponential backoff multiplier
const BACKOFF_MULTIPLIER: f64 = 2.0;
/// Upper bound of the random jitter added to each backoff delay
const JITTER_MAX: Duration = Duration::from_secs(2);

/// Default sampling temperature
const TEMPERATURE: f32 = 0.7;
/// Conservative output token budget to keep quota usage low
const MAX_TOKENS: u32 = 800;
/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Default output directory
const OUTPUT_DIR: &str = "output";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub google_api_key: String,
    /// Serper search API key
    pub serper_api_key: String,
    /// Sampling temperature for all stages
    pub temperature: f32,
    /// Output token budget per stage
    pub max_tokens: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Retry behavior for quota-exhaustion errors
    pub retry: RetryConfig,
    /// Directory for generated postings
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails with a clear message when `GOOGLE_API_KEY` or
    /// `SERPER_API_KEY` is missing; this runs before any network call.
    pub fn from_env() -> Result<Self> {
        let google_api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| Error::MissingEnv("GOOGLE_API_KEY"))?;
        let serper_api_key =
            std::env::var("SERPER_API_KEY").map_err(|_| Error::MissingEnv("SERPER_API_KEY"))?;

        let output_dir = std::env::var("HIRECREW_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(OUTPUT_DIR));

        Ok(Self {
            google_api_key,
            serper_api_key,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            request_timeout: REQUEST_TIMEOUT,
            retry: default_retry(),
            output_dir,
        })
    }
}

/// Retry settings for quota-exhaustion errors: 5 attempts, 5 s base delay
/// doubling to a 120 s cap, up to 2 s of jitter.
fn default_retry() -> RetryConfig {
    RetryConfig::new()
        .with_max_attempts(MAX_RETRIES)
        .with_initial_delay(BASE_REQUEST_DELAY)
        .with_max_delay(MAX_REQUEST_DELAY)
        .with_backoff_multiplier(BACKOFF_MULTIPLIER)
        .with_jitter_max(JITTER_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; run serially via a lock.
    use std::sync::Mutex;
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_keys() {
        std::env::remove_var("GOOGLE_API_KEY");
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("SERPER_API_KEY");
        std::env::remove_var("HIRECREW_OUTPUT_DIR");
    }

    #[test]
    fn test_missing_google_key_fails_fast() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_keys();
        std::env::set_var("SERPER_API_KEY", "serper-key");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, Error::MissingEnv("GOOGLE_API_KEY")));
        clear_keys();
    }

    #[test]
    fn test_missing_serper_key_fails_fast() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_keys();
        std::env::set_var("GOOGLE_API_KEY", "google-key");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, Error::MissingEnv("SERPER_API_KEY")));
        clear_keys();
    }

    #[test]
    fn test_from_env_with_keys() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_keys();
        std::env::set_var("GOOGLE_API_KEY", "google-key");
        std::env::set_var("SERPER_API_KEY", "serper-key");
        std::env::set_var("HIRECREW_OUTPUT_DIR", "/tmp/postings");

        let config = Config::from_env().unwrap();
        assert_eq!(config.google_api_key, "google-key");
        assert_eq!(config.serper_api_key, "serper-key");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/postings"));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay, Duration::from_secs(5));
        assert_eq!(config.retry.max_delay, Duration::from_secs(120));
        clear_keys();
    }
}
