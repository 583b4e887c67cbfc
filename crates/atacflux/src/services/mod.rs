//! Services
//!
//! Concrete pieces of the convergence pipeline: prompt assembly, the
//! Anthropic transport, answer normalization, and snippet rendering.

pub mod anthropic;
pub mod emitter;
pub mod normalizer;
pub mod prompt;

pub use anthropic::AnthropicClient;
pub use emitter::{write_header, write_snippets};
pub use normalizer::normalize_response;
pub use prompt::build_request;
