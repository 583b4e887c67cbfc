//! AtacFlux Convergence Library
//!
//! Asks Claude whether the ATF1 flux bottleneck in the yeast Ehrlich pathway
//! is epigenetic, using four assay layers of evidence, and renders the answer
//! as front-end snippets.
//!
//! # Architecture
//!
//! - **Domain** (`domain/`): the fixed evidence (`LayerData`), the parsed
//!   answer (`Analysis`), value objects, and `ConvergenceError`
//! - **Ports** (`ports/`): the `CompletionProvider` trait and its
//!   request/response types
//! - **Services** (`services/`): Anthropic client, prompt builder, response
//!   normalizer, snippet emitter
//! - **Pipeline** (`pipeline`): the single `run` entry point
//!
//! # Usage
//!
//! ```rust,ignore
//! use atacflux::{pipeline, AnthropicClient, CompletionOptions, LayerData};
//!
//! let client = AnthropicClient::from_lookup(|name| std::env::var(name).ok())?;
//! let analysis = pipeline::run(&client, &LayerData::atf1_locus(), &CompletionOptions::default()).await?;
//! atacflux::services::write_snippets(&mut std::io::stdout(), &analysis)?;
//! ```

pub mod domain;
pub mod pipeline;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use domain::{
    Action, Analysis, Bullet, ConvergenceError, GeneRole, Insight, LayerData, MarkType,
};
pub use ports::{
    ChatMessage, CompletionOptions, CompletionProvider, CompletionRequest, CompletionResponse,
    MessageRole, TokenUsage,
};
pub use services::AnthropicClient;
