//! Research context assembly
//!
//! Gathers web search results and a company-site excerpt into one bounded
//! text block for the research prompts. Both sources are best-effort: a
//! tool failure degrades to an empty section with a warning, and research
//! proceeds from the user-provided description alone.

use crate::scrape::WebScraper;
use crate::serper::{SearchResult, SerperClient, DEFAULT_MAX_RESULTS};
use tracing::warn;

/// Gather search results and a site excerpt for the research stages.
///
/// Returns `None` when nothing could be gathered, so callers can skip the
/// context section entirely.
pub async fn gather_web_context(
    serper: &SerperClient,
    scraper: &WebScraper,
    company_domain: &str,
    hiring_needs: &str,
) -> Option<String> {
    let query = format!("{} company culture values {}", company_domain, hiring_needs);

    let results = match serper.search(&query, DEFAULT_MAX_RESULTS).await {
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, "web search failed, continuing without search results");
            Vec::new()
        }
    };

    let site_excerpt = match scraper.fetch_text(company_domain).await {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "website scrape failed, continuing without site excerpt");
            None
        }
    };

    format_context(&query, &results, company_domain, site_excerpt.as_deref())
}

/// Format the gathered material into a plain-text block.
fn format_context(
    query: &str,
    results: &[SearchResult],
    company_domain: &str,
    site_excerpt: Option<&str>,
) -> Option<String> {
    if results.is_empty() && site_excerpt.is_none() {
        return None;
    }

    let mut block = String::new();

    if !results.is_empty() {
        block.push_str(&format!("Web search results for \"{}\":\n", query));
        for result in results {
            block.push_str(&format!("- {} ({})\n", result.title, result.link));
            if !result.snippet.is_empty() {
                block.push_str(&format!("  {}\n", result.snippet));
            }
        }
    }

    if let Some(excerpt) = site_excerpt {
        if !block.is_empty() {
            block.push('\n');
        }
        block.push_str(&format!("Excerpt from {}:\n{}\n", company_domain, excerpt));
    }

    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> Vec<SearchResult> {
        vec![SearchResult {
            title: "Acme - About".to_string(),
            link: "https://acme.example/about".to_string(),
            snippet: "Rocket-powered software.".to_string(),
        }]
    }

    #[test]
    fn test_format_context_with_both_sources() {
        let block =
            format_context("acme query", &sample_results(), "acme.example", Some("We make rockets."))
                .unwrap();
        assert!(block.contains("Web search results for \"acme query\""));
        assert!(block.contains("Acme - About (https://acme.example/about)"));
        assert!(block.contains("Rocket-powered software."));
        assert!(block.contains("Excerpt from acme.example:\nWe make rockets."));
    }

    #[test]
    fn test_format_context_search_only() {
        let block = format_context("q", &sample_results(), "acme.example", None).unwrap();
        assert!(block.contains("Web search results"));
        assert!(!block.contains("Excerpt from"));
    }

    #[test]
    fn test_format_context_empty_is_none() {
        assert!(format_context("q", &[], "acme.example", None).is_none());
    }
}
