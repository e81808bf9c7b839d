//! Request and result types for the job posting pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structured input collected from the user. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPostingRequest {
    /// Company website domain (e.g. "acme.example")
    pub company_domain: String,
    /// Short description of the company
    pub company_description: String,
    /// What the company is hiring for
    pub hiring_needs: String,
    /// Benefits specific to this role
    pub specific_benefits: String,
}

/// Output of one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Task name
    pub task: String,
    /// Agent that produced the output
    pub agent: String,
    /// Produced text
    pub content: String,
}

/// Metadata persisted alongside the markdown posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingMetadata {
    /// When the posting was generated
    pub generated_at: DateTime<Utc>,
    /// The input that produced it
    pub request: JobPostingRequest,
    /// Model used for generation
    pub model: String,
    /// Path of the markdown file
    pub markdown_path: PathBuf,
    /// Names of the executed tasks, in order
    pub tasks: Vec<String>,
}

/// A persisted posting: the markdown text plus its metadata.
#[derive(Debug, Clone)]
pub struct GeneratedPosting {
    /// Final posting markdown
    pub markdown: String,
    /// Sidecar metadata
    pub metadata: PostingMetadata,
    /// Path of the metadata file
    pub metadata_path: PathBuf,
}
