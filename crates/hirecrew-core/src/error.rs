//! Error types for hirecrew-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Required environment variable is missing
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    /// Task template rendering failed
    #[error("template error in task '{task}': {message}")]
    Render {
        /// Task name
        task: String,
        /// Detailed message
        message: String,
    },

    /// A task referenced an unknown agent
    #[error("unknown agent '{0}'")]
    UnknownAgent(String),

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] hirecrew_llm::Error),

    /// Filesystem error while persisting output
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata serialization error
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
