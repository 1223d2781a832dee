//! `chunk-sizes` — token-count statistics for a chunk corpus.
//!
//! Reads one corpus file, prints an indented JSON report to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use chunklens::config::Config;
use chunklens::corpus::Corpus;
use chunklens::sizes;

/// Analyze the token-count distribution of a chunk corpus
#[derive(Parser, Debug)]
#[command(name = "chunk-sizes", version)]
struct Cli {
    /// Corpus file: JSON with a top-level "chunks" array, or JSON Lines
    chunks_file: PathBuf,

    /// Optional JSON file overriding the heuristic thresholds
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only the JSON report
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // 1. Load thresholds
    let config = Config::load(cli.config.as_deref());
    config.validate().context("invalid configuration")?;

    // 2. Load corpus
    let corpus = Corpus::from_file(&cli.chunks_file)?;

    // 3. Compute and print
    let report = sizes::analyze(&corpus, &config.thresholds);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
