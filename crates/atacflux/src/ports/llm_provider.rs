//! LLM Provider Port
//!
//! Abstract interface for one completion call. The pipeline only depends on
//! this trait, so the Anthropic client can be swapped for a canned provider
//! in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ConvergenceError;

/// Model used when nothing overrides it
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// Token budget used when nothing overrides it
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Options for LLM completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Request body, shaped like the Messages API payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: TokenUsage,
    /// Why generation stopped (`end_turn`, `max_tokens`, ...)
    pub stop_reason: Option<String>,
}

impl CompletionResponse {
    /// The answer hit the token budget and is likely cut off
    pub fn is_truncated(&self) -> bool {
        self.stop_reason.as_deref() == Some("max_tokens")
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub input_tokens: u32,
    /// Tokens in the completion
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// LLM Provider interface
///
/// One call, no retries: implementations surface every failure to the caller.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the request
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ConvergenceError>;

    /// Get the provider name (e.g., "anthropic")
    fn provider_name(&self) -> &str;
}
