//! Website scraping
//!
//! Fetches a page and reduces it to plain text small enough to embed in a
//! research prompt: script/style blocks and tags are stripped, entities
//! decoded, whitespace collapsed, and the result truncated.

use crate::error::{Error, Result};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// HTTP timeout for the page fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Character cap on the extracted text, keeps the prompt inside the token budget
pub(crate) const MAX_TEXT_CHARS: usize = 4000;

/// User-Agent header; some sites reject requests without one
const USER_AGENT: &str = "Mozilla/5.0 (compatible; hirecrew/0.1)";

/// Fetches company websites and extracts readable text.
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    /// Create a new scraper.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetch `url` and return its readable text, truncated to the cap.
    ///
    /// A bare domain is promoted to an `https://` URL.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let url = normalize_url(url)?;
        debug!(%url, "fetching page for scrape");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!("{} returned HTTP {}", url, status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(extract_text(&html, MAX_TEXT_CHARS))
    }
}

/// Promote a bare domain to an https URL; reject empty input.
fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("url must not be empty".to_string()));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{}", trimmed))
    }
}

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|head)\b.*?</(script|style|noscript|head)>")
        .expect("BLOCK_RE is a compile-time constant")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG_RE is a compile-time constant"));

/// Strip markup from HTML and return readable text, truncated to `max_chars`.
pub(crate) fn extract_text(html: &str, max_chars: usize) -> String {
    // Drop non-content blocks first so their contents never leak into the text
    let without_blocks = BLOCK_RE.replace_all(html, " ");
    let stripped = TAG_RE.replace_all(&without_blocks, " ");

    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(max_chars) {
        Some((idx, _)) => collapsed[..idx].to_string(),
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_strips_tags_and_scripts() {
        let html = r#"
            <html><head><title>Acme</title><style>body { color: red; }</style></head>
            <body>
                <script>var tracking = "secret";</script>
                <h1>About &amp; Mission</h1>
                <p>We build   things.</p>
            </body></html>
        "#;
        let text = extract_text(html, 1000);
        assert_eq!(text, "About & Mission We build things.");
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_extract_text_truncates_on_char_boundary() {
        let html = "<p>héllo wörld</p>";
        let text = extract_text(html, 4);
        assert_eq!(text, "héll");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("acme.example").unwrap(), "https://acme.example");
        assert_eq!(
            normalize_url("http://acme.example").unwrap(),
            "http://acme.example"
        );
        assert!(normalize_url("  ").is_err());
    }
}
