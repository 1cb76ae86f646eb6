//! CLI binary for md2jsonld.
//!
//! A thin shim over the library crate: two positional directories and one
//! `--prettify` flag. Any failure prints a single diagnostic line and exits
//! with status 1; clap handles usage errors.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2jsonld::{convert_tree, ConversionConfig, ConversionProgressCallback, ProgressCallback};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Renders a progress bar on stderr. Documents complete out of order, so the
/// bar only counts; it never tries to show which document is current.
/// indicatif hides the bar when stderr is not a terminal.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_documents: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>4}/{len} documents  {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_documents as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
    }

    fn on_document_complete(&self, _document: &str, _record: &str) {
        self.bar.inc(1);
    }

    fn on_document_error(&self, _document: &str, _error: &str) {
        self.bar.abandon();
    }

    fn on_conversion_complete(&self, _total_documents: usize) {
        self.bar.finish_and_clear();
    }
}

/// Convert a directory of Markdown documents into JSON-LD records.
#[derive(Parser, Debug)]
#[command(
    name = "md2jsonld",
    version,
    about = "Convert a directory of Markdown documents into JSON-LD records",
    long_about = "Walks INPUT_DIRECTORY for *.md files and writes one schema.org CreativeWork \
record per document to the mirrored path under OUTPUT_DIRECTORY (doc.md → doc.jsonld), \
plus an _index.jsonld manifest listing every record.",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// Directory to scan for Markdown documents.
    input_directory: PathBuf,

    /// Directory that receives the records and the manifest.
    output_directory: PathBuf,

    /// Indent JSON output.
    #[arg(long)]
    prettify: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let progress: ProgressCallback = CliProgressCallback::new();
    let config = ConversionConfig::builder()
        .prettify(cli.prettify)
        .progress_callback(progress)
        .build()
        .context("Invalid configuration")?;

    let report = convert_tree(&cli.input_directory, &cli.output_directory, &config)
        .await
        .context("Conversion failed")?;

    tracing::info!(
        "Converted {} documents in {}ms, manifest at {}",
        report.len(),
        report.duration_ms,
        report.manifest_path.display()
    );
    Ok(())
}
