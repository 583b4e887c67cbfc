//! AtacFlux CLI - ATF1 convergence answer
//!
//! Sends the fixed epigenomic evidence to Claude once and prints the
//! `aiTextChunks` / `aiInsights` / `aiActions` snippets for
//! GeneTopologyPage.jsx. Run with no arguments for the standard request.

mod config;

use anyhow::{Context, Result};
use atacflux::services::{emitter, write_header, write_snippets};
use atacflux::{pipeline, AnthropicClient, Analysis, ConvergenceError, LayerData};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use config::{Config, Overrides, Settings};

const RETRY_HINT: &str = "Claude didn't return valid JSON. Run it again.";

#[derive(Parser)]
#[command(name = "atacflux")]
#[command(about = "Ask Claude whether the ATF1 bottleneck is epigenetic and print front-end snippets", long_about = None)]
#[command(version)]
struct Cli {
    /// Model identifier (overrides config file)
    #[arg(long)]
    model: Option<String>,

    /// Token budget for the answer (overrides config file)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// API base URL (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Config file (defaults to ~/.config/atacflux/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the snippets to this file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the request payload instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = config.resolve(Overrides {
        model: cli.model,
        max_tokens: cli.max_tokens,
        base_url: cli.base_url,
    });

    let data = LayerData::atf1_locus();

    if cli.dry_run {
        let request = atacflux::services::build_request(&data, &settings.options)?;
        eprintln!("{} POST {}/v1/messages", "Dry run:".yellow(), settings.base_url);
        println!(
            "{}",
            serde_json::to_string_pretty(&request).context("Failed to serialize request")?
        );
        return Ok(());
    }

    // Credential first: nothing goes over the wire without it
    let client = connect(&settings, |name| std::env::var(name).ok())?;
    tracing::debug!(base_url = client.base_url(), "Using Messages endpoint");

    let analysis = match pipeline::run(&client, &data, &settings.options).await {
        Ok(analysis) => analysis,
        Err(ConvergenceError::UnparsableResponse { text, reason }) => {
            tracing::debug!(reason = %reason, "Answer failed to parse");
            let code = report_unparsable(&mut io::stdout().lock(), &text)?;
            std::process::exit(code);
        }
        Err(err) => return Err(err).context("Convergence request failed"),
    };

    print_snippets(&analysis)?;

    if let Some(path) = &cli.out {
        write_snippet_file(path, &analysis)?;
        eprintln!("{} Snippets written to {:?}", "✓".green(), path);
    }

    Ok(())
}

/// Client for the resolved endpoint; fails before any I/O without a key
fn connect<F>(settings: &Settings, lookup: F) -> Result<AnthropicClient>
where
    F: FnOnce(&str) -> Option<String>,
{
    let client = AnthropicClient::from_lookup(lookup)
        .context("Set ANTHROPIC_API_KEY in the environment or a .env file")?
        .with_base_url(&settings.base_url);
    Ok(client)
}

/// Raw answer plus retry hint; returns the process exit code
fn report_unparsable<W: Write>(out: &mut W, text: &str) -> io::Result<i32> {
    writeln!(out, "=== RAW RESPONSE (failed to parse) ===")?;
    writeln!(out, "{}", text)?;
    writeln!(out, "\n{}", RETRY_HINT)?;
    out.flush()?;
    Ok(1)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("atacflux=info,atacflux_cli=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_snippets(analysis: &Analysis) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_header(&mut out)?;
    write_snippets(&mut out, analysis)?;
    out.flush()?;
    Ok(())
}

/// Snippet blocks only, without the paste banner
fn write_snippet_file(path: &Path, analysis: &Analysis) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut out = BufWriter::new(file);
    write_snippets(&mut out, analysis)
        .and_then(|_| out.flush())
        .with_context(|| format!("Failed to write snippets to {:?}", path))?;

    tracing::info!(path = %path.display(), paste_into = emitter::PASTE_TARGET, "Saved snippets");
    Ok(())
}
