//! Domain Errors
//!
//! Error types for the convergence pipeline.

use thiserror::Error;

/// Errors raised while building, sending, or interpreting a convergence request
#[derive(Debug, Error)]
pub enum ConvergenceError {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by the API")]
    RateLimited,

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Model answer is not valid JSON: {reason}")]
    UnparsableResponse { text: String, reason: String },

    #[error("Model answer is not a JSON object")]
    NotAnObject,

    #[error("Model answer has no '{0}' list")]
    MissingKey(String),

    #[error("Model answer '{section}' is not a list")]
    NotAList { section: String },

    #[error("{section}[{index}] is not an object")]
    InvalidEntry { section: String, index: usize },

    #[error("missing field '{field}' in {section}[{index}]")]
    MissingField {
        section: String,
        index: usize,
        field: String,
    },

    #[error("invalid field '{field}' in {section}[{index}]: expected {expected}")]
    InvalidField {
        section: String,
        index: usize,
        field: String,
        expected: String,
    },
}

impl ConvergenceError {
    pub fn missing_field<S: AsRef<str>, F: AsRef<str>>(section: S, index: usize, field: F) -> Self {
        Self::MissingField {
            section: section.as_ref().to_string(),
            index,
            field: field.as_ref().to_string(),
        }
    }

    pub fn invalid_field<S: AsRef<str>, F: AsRef<str>>(
        section: S,
        index: usize,
        field: F,
        expected: &str,
    ) -> Self {
        Self::InvalidField {
            section: section.as_ref().to_string(),
            index,
            field: field.as_ref().to_string(),
            expected: expected.to_string(),
        }
    }

    /// The model answered, but not with JSON. The only failure worth re-running for.
    pub fn is_unparsable(&self) -> bool {
        matches!(self, Self::UnparsableResponse { .. })
    }
}
