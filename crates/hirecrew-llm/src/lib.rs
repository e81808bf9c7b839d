//! Hirecrew LLM - Gemini integration for the job posting pipeline
//!
//! This crate provides the LLM layer for hirecrew:
//! - Provider: the `LlmProvider` trait and the Gemini implementation
//! - Retry: exponential backoff with jitter for quota-exhaustion errors
//! - Mock: a scriptable provider for testing the pipeline offline

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod gemini;
pub mod message;
pub mod mock;
pub mod provider;
pub mod retry;

pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{Error, Result};
pub use gemini::{GeminiConfig, GeminiProvider};
pub use message::{Message, MessageRole};
pub use mock::MockProvider;
pub use provider::LlmProvider;
pub use retry::{retry_with_backoff, Backoff, RetryConfig, RetryError};
