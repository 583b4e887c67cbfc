//! Anthropic Messages API client
//!
//! Implements [`CompletionProvider`] with a single POST to `/v1/messages`.
//! No retries: every failure is returned to the caller as-is.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::domain::errors::ConvergenceError;
use crate::ports::{CompletionProvider, CompletionRequest, CompletionResponse, TokenUsage};

/// Environment variable holding the credential
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a new client using the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Resolves the key through `lookup`; a blank value counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConvergenceError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConvergenceError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Overrides the API base URL if needed.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ConvergenceError> {
        let url = self.messages_url();
        tracing::debug!(url = %url, model = %request.model, "Sending Messages API request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|err| ConvergenceError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: MessagesResponse = response
            .json()
            .await
            .map_err(|err| ConvergenceError::UnexpectedResponse(err.to_string()))?;

        extract_completion(payload)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

// ============================================
// Response Types
// ============================================

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

// ============================================
// Helper Functions
// ============================================

/// The answer is the text of the first content block.
fn extract_completion(payload: MessagesResponse) -> Result<CompletionResponse, ConvergenceError> {
    let first = payload
        .content
        .into_iter()
        .next()
        .ok_or_else(|| ConvergenceError::UnexpectedResponse("response has no content".to_string()))?;

    let content = first.text.ok_or_else(|| {
        ConvergenceError::UnexpectedResponse(format!(
            "first content block ({}) has no text",
            first.kind.as_deref().unwrap_or("untyped")
        ))
    })?;

    let usage = payload
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        })
        .unwrap_or_default();

    Ok(CompletionResponse {
        content,
        model: payload.model,
        usage,
        stop_reason: payload.stop_reason,
    })
}

fn map_http_error(status: StatusCode, body: String) -> ConvergenceError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ConvergenceError::RateLimited;
    }

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    ConvergenceError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> MessagesResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_key_fails_at_lookup() {
        let result = AnthropicClient::from_lookup(|_| None);
        assert!(matches!(result, Err(ConvergenceError::MissingApiKey)));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let result = AnthropicClient::from_lookup(|_| Some("   ".to_string()));
        assert!(matches!(result, Err(ConvergenceError::MissingApiKey)));
    }

    #[test]
    fn test_lookup_reads_anthropic_variable() {
        let client = AnthropicClient::from_lookup(|name| {
            (name == "ANTHROPIC_API_KEY").then(|| "sk-ant-test".to_string())
        })
        .unwrap();
        assert_eq!(client.api_key, "sk-ant-test");
        assert_eq!(client.messages_url(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_base_url_override_drops_trailing_slash() {
        let client = AnthropicClient::new("k").with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.messages_url(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_extracts_first_text_block() {
        let payload = decode(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "content": [
                {"type": "text", "text": "{\"bullets\": []}"},
                {"type": "text", "text": "ignored"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 812, "output_tokens": 245}
        }));

        let completion = extract_completion(payload).unwrap();
        assert_eq!(completion.content, "{\"bullets\": []}");
        assert_eq!(completion.model, "claude-sonnet-4-20250514");
        assert_eq!(completion.usage.total(), 1057);
        assert!(!completion.is_truncated());
    }

    #[test]
    fn test_empty_content_is_unexpected() {
        let payload = decode(json!({"content": [], "model": "m"}));
        assert!(matches!(
            extract_completion(payload),
            Err(ConvergenceError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_non_text_block_is_unexpected() {
        let payload = decode(json!({"content": [{"type": "tool_use", "id": "t1"}]}));
        let err = extract_completion(payload).unwrap_err();
        assert!(err.to_string().contains("tool_use"));
    }

    #[test]
    fn test_api_error_uses_error_message() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = map_http_error(StatusCode::UNAUTHORIZED, body.to_string());
        assert!(matches!(
            err,
            ConvergenceError::Api { status: 401, ref message } if message == "invalid x-api-key"
        ));
    }

    #[test]
    fn test_api_error_falls_back_to_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err.to_string(), "API error (502): upstream down");
    }

    #[test]
    fn test_too_many_requests_is_rate_limited() {
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(matches!(err, ConvergenceError::RateLimited));
    }
}
