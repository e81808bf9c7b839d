//! Output persistence
//!
//! Writes the generated posting to `<Company>_<Role>_<timestamp>.md` plus a
//! matching `.json` metadata sidecar in the output directory, and provides
//! the `list`/`cleanup` maintenance operations over that directory.

use crate::crew::CrewReport;
use crate::error::Result;
use crate::posting::{GeneratedPosting, JobPostingRequest, PostingMetadata};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Maximum length of a sanitized filename component
const COMPONENT_MAX_LEN: usize = 40;

/// Number of leading words of the hiring needs used for the role component
const ROLE_WORDS: usize = 4;

/// A saved posting visible to `list`.
#[derive(Debug, Clone)]
pub struct PostingEntry {
    /// File name of the markdown file
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// Persists generated postings to a fixed output directory.
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    /// Create a store over the given directory (created lazily on save).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the posting markdown and its metadata sidecar.
    ///
    /// The file name is `<Company>_<Role>_<timestamp>`; a numeric suffix
    /// is appended when two runs land in the same second, so every run
    /// gets a unique name. An unwritable directory fails the run with the
    /// underlying filesystem error; there is no retry.
    pub fn save(
        &self,
        request: &JobPostingRequest,
        report: &CrewReport,
        model: &str,
    ) -> Result<GeneratedPosting> {
        fs::create_dir_all(&self.dir)?;

        let generated_at = Utc::now();
        let base = format!(
            "{}_{}_{}",
            company_component(&request.company_domain),
            role_component(&request.hiring_needs),
            generated_at.format("%Y%m%d_%H%M%S"),
        );
        let stem = self.unique_stem(&base);

        let markdown_path = self.dir.join(format!("{}.md", stem));
        let metadata_path = self.dir.join(format!("{}.json", stem));

        fs::write(&markdown_path, &report.posting)?;

        let metadata = PostingMetadata {
            generated_at,
            request: request.clone(),
            model: model.to_string(),
            markdown_path: markdown_path.clone(),
            tasks: report.task_outputs.iter().map(|o| o.task.clone()).collect(),
        };
        fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

        info!(path = %markdown_path.display(), "posting saved");

        Ok(GeneratedPosting {
            markdown: report.posting.clone(),
            metadata,
            metadata_path,
        })
    }

    /// Find an unused file stem, appending `_2`, `_3`, ... on collision.
    fn unique_stem(&self, base: &str) -> String {
        if !self.dir.join(format!("{}.md", base)).exists() {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", base, n);
            if !self.dir.join(format!("{}.md", candidate)).exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// List saved postings, newest first.
    pub fn list(&self) -> Result<Vec<PostingEntry>> {
        let mut entries = Vec::new();
        if !self.dir.exists() {
            return Ok(entries);
        }

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let metadata = entry.metadata()?;
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            entries.push(PostingEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                size: metadata.len(),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        entries.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(entries)
    }

    /// Delete postings (and their sidecars) older than `days` days.
    ///
    /// Returns the number of files removed.
    pub fn cleanup(&self, days: u64) -> Result<usize> {
        let cutoff = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        self.cleanup_before(cutoff)
    }

    /// Delete postings last modified before `cutoff`.
    pub fn cleanup_before(&self, cutoff: SystemTime) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if ext != Some("md") && ext != Some("json") {
                continue;
            }
            let modified = entry.metadata()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            if modified < cutoff {
                debug!(path = %path.display(), "removing old posting file");
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Keep `[A-Za-z0-9_-]`, map whitespace runs to `_`, drop the rest, and
/// truncate. Path-hostile characters never reach the filesystem.
fn sanitize_component(raw: &str) -> String {
    let mut out = String::new();
    let mut last_was_sep = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
            last_was_sep = false;
        } else if (c.is_whitespace() || c == '_') && !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    let trimmed = out.trim_end_matches('_');
    trimmed.chars().take(COMPONENT_MAX_LEN).collect()
}

/// Derive the company component from the domain: strip scheme and `www.`,
/// take the first label, capitalize it.
fn company_component(domain: &str) -> String {
    let host = domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");
    let label = host
        .split(['.', '/'])
        .find(|part| !part.is_empty())
        .unwrap_or("company");

    let sanitized = sanitize_component(label);
    if sanitized.is_empty() {
        return "Company".to_string();
    }
    let mut chars = sanitized.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => "Company".to_string(),
    }
}

/// Derive the role component from the leading words of the hiring needs.
fn role_component(hiring_needs: &str) -> String {
    let leading = hiring_needs
        .split_whitespace()
        .take(ROLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    let sanitized = sanitize_component(&leading);
    if sanitized.is_empty() {
        "Role".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::TaskOutput;
    use tempfile::tempdir;

    fn sample_request() -> JobPostingRequest {
        JobPostingRequest {
            company_domain: "www.acme.example".to_string(),
            company_description: "Rocket-powered software".to_string(),
            hiring_needs: "Senior Rust Engineer (remote)".to_string(),
            specific_benefits: "Remote-first".to_string(),
        }
    }

    fn sample_report() -> CrewReport {
        CrewReport {
            task_outputs: vec![TaskOutput {
                task: "review_and_edit".to_string(),
                agent: "Review and Editing Specialist".to_string(),
                content: "# Senior Rust Engineer\n\nJoin Acme.".to_string(),
            }],
            posting: "# Senior Rust Engineer\n\nJoin Acme.".to_string(),
        }
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("Senior Rust Engineer"), "Senior_Rust_Engineer");
        assert_eq!(sanitize_component("a/b\\c:d*e"), "abcde");
        assert_eq!(sanitize_component("  spaced   out  "), "spaced_out");
        assert_eq!(sanitize_component("../../etc/passwd"), "etcpasswd");
    }

    #[test]
    fn test_company_component() {
        assert_eq!(company_component("www.acme.example"), "Acme");
        assert_eq!(company_component("https://acme.example/about"), "Acme");
        assert_eq!(company_component("acme"), "Acme");
        assert_eq!(company_component(""), "Company");
    }

    #[test]
    fn test_role_component() {
        assert_eq!(
            role_component("Senior Rust Engineer (remote) with many extra words"),
            "Senior_Rust_Engineer_remote"
        );
        assert_eq!(role_component("   "), "Role");
    }

    #[test]
    fn test_save_writes_markdown_and_sidecar() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        let posting = store.save(&sample_request(), &sample_report(), "gemini-1.5-flash").unwrap();

        let name = posting.metadata.markdown_path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Acme_Senior_Rust_Engineer_remote_"));
        assert!(name.ends_with(".md"));
        assert!(posting.metadata.markdown_path.exists());
        assert!(posting.metadata_path.exists());

        let sidecar = std::fs::read_to_string(&posting.metadata_path).unwrap();
        let parsed: PostingMetadata = serde_json::from_str(&sidecar).unwrap();
        assert_eq!(parsed.model, "gemini-1.5-flash");
        assert_eq!(parsed.request.company_domain, "www.acme.example");
        assert_eq!(parsed.tasks, vec!["review_and_edit".to_string()]);

        let markdown = std::fs::read_to_string(&posting.metadata.markdown_path).unwrap();
        assert_eq!(markdown, "# Senior Rust Engineer\n\nJoin Acme.");
    }

    #[test]
    fn test_same_second_saves_get_unique_names() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        // Two saves within the same second must not collide
        let first = store.save(&sample_request(), &sample_report(), "m").unwrap();
        let second = store.save(&sample_request(), &sample_report(), "m").unwrap();

        assert_ne!(first.metadata.markdown_path, second.metadata.markdown_path);
        assert!(first.metadata.markdown_path.exists());
        assert!(second.metadata.markdown_path.exists());
    }

    #[test]
    fn test_list_returns_markdown_newest_first() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        assert!(store.list().unwrap().is_empty());

        store.save(&sample_request(), &sample_report(), "m").unwrap();
        store.save(&sample_request(), &sample_report(), "m").unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].modified >= entries[1].modified);
        assert!(entries.iter().all(|e| e.name.ends_with(".md")));
    }

    #[test]
    fn test_cleanup_respects_cutoff() {
        let dir = tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        store.save(&sample_request(), &sample_report(), "m").unwrap();

        // Cutoff in the past: nothing is old enough to remove
        let past = SystemTime::now() - Duration::from_secs(3600);
        assert_eq!(store.cleanup_before(past).unwrap(), 0);

        // Cutoff in the future: both the .md and .json go
        let future = SystemTime::now() + Duration::from_secs(60);
        assert_eq!(store.cleanup_before(future).unwrap(), 2);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let store = OutputStore::new("/nonexistent/hirecrew-test-dir");
        assert_eq!(store.cleanup(7).unwrap(), 0);
        assert!(store.list().unwrap().is_empty());
    }
}
