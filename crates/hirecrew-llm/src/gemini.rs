//! Gemini - Google Gemini API provider
//!
//! Implements the `generateContent` REST endpoint using reqwest. Quota
//! exhaustion (429) is surfaced as [`Error::RateLimit`] with the
//! API-suggested retry delay when the response carries one, so the retry
//! wrapper can honor it.

use crate::completion::{CompletionRequest, CompletionResponse, TokenUsage};
use crate::error::{Error, Result};
use crate::message::MessageRole;
use crate::provider::LlmProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Default model, matching the pipeline's conservative token budget
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: GeminiContent,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: u32,
    /// May be absent for empty responses
    #[serde(default)]
    candidates_token_count: Option<u32>,
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[allow(dead_code)]
    code: i32,
    message: String,
    status: String,
    /// Error details array (may contain retryDelay for 429 responses)
    #[serde(default)]
    details: Option<Vec<serde_json::Value>>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Default max output tokens
    pub max_output_tokens: u32,
    /// Default sampling temperature
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

// Custom Debug implementation to mask the API key
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: 800,
            temperature: 0.7,
            timeout: Duration::from_secs(120),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Requires `GOOGLE_API_KEY` (or `GEMINI_API_KEY`); `GEMINI_MODEL` and
    /// `GEMINI_BASE_URL` override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| {
                Error::NotConfigured("GOOGLE_API_KEY or GEMINI_API_KEY not set".to_string())
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the default max output tokens
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_tokens: u32) -> Self {
        self.max_output_tokens = max_tokens;
        self
    }

    /// Set the default temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Mask an API key for logging: keep the first four characters
fn mask_api_key(key: &str) -> String {
    if key.len() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", &key[..4])
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Convert a completion request into the Gemini wire format.
    ///
    /// System messages become the `systemInstruction`; user/assistant
    /// messages map to `user`/`model` contents.
    fn convert_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let mut system_texts = Vec::new();
        let mut contents = Vec::new();

        for message in &request.messages {
            match message.role {
                MessageRole::System => system_texts.push(message.content.clone()),
                MessageRole::User | MessageRole::Assistant => {
                    let role = if message.role == MessageRole::User {
                        "user"
                    } else {
                        "model"
                    };
                    contents.push(GeminiContent {
                        role: Some(role.to_string()),
                        parts: vec![GeminiPart {
                            text: message.content.clone(),
                        }],
                    });
                }
            }
        }

        let system_instruction = if system_texts.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system_texts.join("\n\n"),
                }],
            })
        };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: request.temperature.or(Some(self.config.temperature)),
                max_output_tokens: request
                    .max_tokens
                    .or(Some(self.config.max_output_tokens)),
            }),
        }
    }

    /// Single attempt to send a request to the Gemini API
    async fn send_request(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
        // Don't log the full URL (contains the API key)
        debug!(model, "sending request to Gemini");

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(map_error_response(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(format!("{}: {}", e, truncate(&body, 200))))
    }
}

/// Map a non-success HTTP response to an [`Error`]
fn map_error_response(status: reqwest::StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<GeminiError>(body).ok().map(|e| e.error);

    if let Some(ref d) = detail {
        warn!(
            status = %status,
            error_status = %d.status,
            error_message = %d.message,
            "Gemini API error"
        );
    } else {
        warn!(status = %status, "Gemini API error (unparseable body)");
    }

    match status.as_u16() {
        401 | 403 => Error::Auth(
            detail
                .map(|d| d.message)
                .unwrap_or_else(|| format!("HTTP {}", status)),
        ),
        429 => Error::RateLimit {
            retry_after: detail.as_ref().and_then(parse_retry_secs),
        },
        s if s >= 500 => Error::ServerError(
            detail
                .map(|d| format!("{}: {}", d.status, d.message))
                .unwrap_or_else(|| format!("HTTP {}", status)),
        ),
        _ => Error::Api(
            detail
                .map(|d| format!("{}: {}", d.status, d.message))
                .unwrap_or_else(|| format!("HTTP {}: {}", status, truncate(body, 200))),
        ),
    }
}

/// Extract the suggested retry delay (seconds) from a 429 error.
///
/// Checks the `details` array for a `retryDelay: "Ns"` entry, then falls
/// back to the "Your quota will reset after Ns." message text.
fn parse_retry_secs(detail: &GeminiErrorDetail) -> Option<u64> {
    if let Some(details) = detail.details.as_ref() {
        for entry in details {
            if let Some(delay) = entry.get("retryDelay").and_then(|v| v.as_str()) {
                if let Some(secs) = delay
                    .strip_suffix('s')
                    .and_then(|s| s.parse::<u64>().ok())
                {
                    return Some(secs);
                }
            }
        }
    }

    let message = &detail.message;
    if let Some(pos) = message.find("reset after ") {
        let rest = &message[pos + 12..];
        if let Some(s_pos) = rest.find('s') {
            if let Ok(secs) = rest[..s_pos].trim().parse::<u64>() {
                return Some(secs);
            }
        }
    }
    None
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        };

        let wire_request = self.convert_request(&request);
        let response = self.send_request(&model, &wire_request).await?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("no candidates in response".to_string()))?;

        let content = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count,
        });

        Ok(CompletionResponse {
            content,
            usage,
            finish_reason: candidate.finish_reason,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("AIzaSyExample"), "AIza****");
        assert_eq!(mask_api_key("abc"), "****");
    }

    #[test]
    fn test_config_debug_masks_key() {
        let config = GeminiConfig::new("AIzaSySecretKey123");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("SecretKey"));
        assert!(debug.contains("AIza****"));
    }

    #[test]
    fn test_convert_request_roles() {
        let provider = GeminiProvider::new(GeminiConfig::new("test-key")).unwrap();
        let request = CompletionRequest::new("gemini-1.5-flash")
            .with_message(Message::system("You are the editor"))
            .with_message(Message::user("Review this posting"))
            .with_message(Message::assistant("Done"));

        let wire = provider.convert_request(&request);
        assert!(wire.system_instruction.is_some());
        assert_eq!(wire.contents.len(), 2);
        assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
        assert_eq!(wire.contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_convert_request_applies_config_defaults() {
        let provider = GeminiProvider::new(
            GeminiConfig::new("test-key")
                .with_max_output_tokens(500)
                .with_temperature(0.5),
        )
        .unwrap();
        let request =
            CompletionRequest::new("gemini-1.5-flash").with_message(Message::user("hello"));

        let wire = provider.convert_request(&request);
        let generation = wire.generation_config.unwrap();
        assert_eq!(generation.max_output_tokens, Some(500));
        assert_eq!(generation.temperature, Some(0.5));
    }

    #[test]
    fn test_parse_retry_secs_from_details() {
        let body = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED",
                "details": [
                    {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "37s"}
                ]
            }
        }"#;
        let err: GeminiError = serde_json::from_str(body).unwrap();
        assert_eq!(parse_retry_secs(&err.error), Some(37));
    }

    #[test]
    fn test_parse_retry_secs_from_message() {
        let body = r#"{
            "error": {
                "code": 429,
                "message": "Quota exceeded. Your quota will reset after 58s.",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;
        let err: GeminiError = serde_json::from_str(body).unwrap();
        assert_eq!(parse_retry_secs(&err.error), Some(58));
    }

    #[test]
    fn test_map_error_response_classification() {
        let quota = r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            map_error_response(reqwest::StatusCode::TOO_MANY_REQUESTS, quota),
            Error::RateLimit { .. }
        ));

        let auth = r#"{"error":{"code":403,"message":"key invalid","status":"PERMISSION_DENIED"}}"#;
        assert!(matches!(
            map_error_response(reqwest::StatusCode::FORBIDDEN, auth),
            Error::Auth(_)
        ));

        assert!(matches!(
            map_error_response(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            Error::ServerError(_)
        ));

        let bad = r#"{"error":{"code":400,"message":"bad request","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_error_response(reqwest::StatusCode::BAD_REQUEST, bad),
            Error::Api(_)
        ));
    }
}
