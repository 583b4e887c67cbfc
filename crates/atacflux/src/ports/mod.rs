//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the pipeline talks to external
//! systems. The Anthropic implementation lives in `services`.

pub mod llm_provider;

// Re-exports
pub use llm_provider::*;
