//! Convergence Pipeline
//!
//! One linear pass: build the request, make the single completion call,
//! normalize the answer, and parse it into an [`Analysis`]. Emission is left
//! to the caller so a failed parse never produces partial output.

use crate::domain::entities::{Analysis, LayerData};
use crate::domain::errors::ConvergenceError;
use crate::ports::{CompletionOptions, CompletionProvider};
use crate::services::{build_request, normalize_response};

/// Ask the provider for the convergence answer on `data`
pub async fn run<P>(
    provider: &P,
    data: &LayerData,
    options: &CompletionOptions,
) -> Result<Analysis, ConvergenceError>
where
    P: CompletionProvider + ?Sized,
{
    let request = build_request(data, options)?;

    tracing::info!(
        provider = provider.provider_name(),
        model = %request.model,
        max_tokens = request.max_tokens,
        bottleneck = data.bottleneck_gene().unwrap_or("unknown"),
        "Requesting convergence analysis"
    );

    let response = provider.complete(&request).await?;

    tracing::info!(
        model = %response.model,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        total_tokens = response.usage.total(),
        "Received answer"
    );
    if response.is_truncated() {
        tracing::warn!(
            max_tokens = request.max_tokens,
            "Answer stopped at the token budget and is probably cut off"
        );
    }

    let text = normalize_response(&response.content);
    let analysis = Analysis::parse(&text)?;

    for mismatch in analysis.count_mismatches() {
        tracing::warn!("Answer ignores the prompt's counts: {}", mismatch);
    }

    Ok(analysis)
}
