//! Hirecrew Core - Job posting crew orchestration
//!
//! This crate provides the pipeline itself:
//! - Config: env-backed settings, validated before any network call
//! - Agents: the three role definitions (research, writing, editing)
//! - Tasks: the prompt templates wired to agents
//! - Crew: sequential execution with stage-to-stage context hand-off
//! - Output: markdown + JSON sidecar persistence, listing, cleanup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agents;
pub mod config;
pub mod crew;
pub mod error;
pub mod output;
pub mod posting;
pub mod tasks;

pub use agents::Agent;
pub use config::Config;
pub use crew::{Crew, CrewReport};
pub use error::{Error, Result};
pub use output::{OutputStore, PostingEntry};
pub use posting::{GeneratedPosting, JobPostingRequest, PostingMetadata, TaskOutput};
pub use tasks::Task;
