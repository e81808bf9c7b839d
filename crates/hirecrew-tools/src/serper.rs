//! Serper search client
//!
//! Google search via the serper.dev JSON API. Returns titles, URLs, and
//! snippets from the organic results.

use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Serper API endpoint
const SEARCH_URL: &str = "https://google.serper.dev/search";

/// Maximum number of search results to return
const MAX_RESULTS_CAP: usize = 10;

/// Default number of results
pub(crate) const DEFAULT_MAX_RESULTS: usize = 5;

/// HTTP timeout for the search request
const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// A single search result entry.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Destination URL
    pub link: String,
    /// Result snippet (may be empty)
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchResult>,
}

/// Client for the serper.dev search API.
pub struct SerperClient {
    client: Client,
    api_key: String,
}

impl SerperClient {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    /// Create a client from the `SERPER_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SERPER_API_KEY")
            .map_err(|_| Error::NotConfigured("SERPER_API_KEY not set".to_string()))?;
        Self::new(api_key)
    }

    /// Run a search and return up to `max_results` organic results.
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query must not be empty".to_string()));
        }
        let num = max_results.clamp(1, MAX_RESULTS_CAP);

        debug!(query, num, "running Serper search");

        let response = self
            .client
            .post(SEARCH_URL)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": num }))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Network(format!("serper returned HTTP {}", status)));
        }

        let parsed: SerperResponse =
            serde_json::from_str(&body).map_err(|e| Error::Parse(e.to_string()))?;

        Ok(parsed.organic.into_iter().take(num).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "organic": [
            {"title": "Acme Corp - About Us", "link": "https://acme.example/about",
             "snippet": "Acme builds rocket-powered software."},
            {"title": "Acme Corp careers", "link": "https://acme.example/careers"}
        ],
        "peopleAlsoAsk": []
    }"#;

    #[test]
    fn test_parse_organic_results() {
        let parsed: SerperResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(parsed.organic.len(), 2);
        assert_eq!(parsed.organic[0].title, "Acme Corp - About Us");
        assert_eq!(parsed.organic[0].snippet, "Acme builds rocket-powered software.");
        // Missing snippet defaults to empty
        assert!(parsed.organic[1].snippet.is_empty());
    }

    #[test]
    fn test_parse_no_organic_key() {
        let parsed: SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic.is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let client = SerperClient::new("test-key").unwrap();
        let result = client.search("   ", 5).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
