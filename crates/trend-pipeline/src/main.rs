//! Feedback trend pipeline CLI.
//!
//! # Usage
//!
//! ```bash
//! trend-pipeline run --date 2024-06-30 [--data-dir data] [--output-dir output]
//! trend-pipeline topics
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/feedback-trends/config.toml)
//! 3. --config file
//! 4. Environment variables (TREND_*)
//! 5. CLI flags

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use trend_embeddings::{BoundedEmbedder, LexicalEmbedder};
use trend_extract::KeywordExtractor;
use trend_normalizer::TopicNormalizer;
use trend_pipeline::run_pipeline;
use trend_store::JsonStore;
use trend_types::TrendConfig;

#[derive(Parser)]
#[command(name = "trend-pipeline", about = "App review trend analysis pipeline")]
struct Cli {
    /// Path to a config file (overrides the default location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline for the window ending at a target date
    Run {
        /// Target date (YYYY-MM-DD), last day of the rolling window
        #[arg(long)]
        date: NaiveDate,

        /// Directory containing daily review batches
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory trend reports are written to
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List the canonical topic vocabulary
    Topics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TrendConfig::load(cli.config.as_deref())?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Run {
            date,
            data_dir,
            output_dir,
        } => {
            if let Some(dir) = data_dir {
                config.pipeline.data_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.pipeline.output_dir = dir;
            }

            let normalizer = build_normalizer(&config)?;
            let extractor = KeywordExtractor::new(&config.extractor);

            let summary = run_pipeline(&normalizer, &extractor, &config.pipeline, date)?;
            info!(
                reviews = summary.reviews,
                normalized = summary.normalized,
                failures = summary.failures,
                "done"
            );
            println!("Trend report: {}", summary.report_path.display());
            if summary.failures > 0 {
                eprintln!("{} item(s) skipped, see log", summary.failures);
            }
        }
        Commands::Topics => {
            let normalizer = build_normalizer(&config)?;
            for topic in normalizer.canonical_topics() {
                println!("{topic}");
            }
        }
    }

    Ok(())
}

fn build_normalizer(config: &TrendConfig) -> Result<TopicNormalizer> {
    let store = JsonStore::open(&config.normalizer.state_dir)?;
    let embedder = BoundedEmbedder::new(
        Arc::new(LexicalEmbedder::new()),
        Duration::from_millis(config.normalizer.embed_timeout_ms),
    );
    let normalizer = TopicNormalizer::new(store, Arc::new(embedder), &config.normalizer)?;
    Ok(normalizer)
}
