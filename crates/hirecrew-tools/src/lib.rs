//! Hirecrew Tools - Web research inputs for the job posting pipeline
//!
//! This crate provides the research tools:
//! - Serper: Google search via the serper.dev JSON API
//! - Scrape: fetch a company website and reduce it to prompt-sized text
//! - Context: assemble both into a bounded block for the research prompts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod scrape;
pub mod serper;

pub use context::gather_web_context;
pub use error::{Error, Result};
pub use scrape::WebScraper;
pub use serper::{SearchResult, SerperClient};
