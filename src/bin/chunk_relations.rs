//! `chunk-relations` — relationship graph explorer for a chunk corpus.
//!
//! With no target id, prints a corpus-wide connectivity summary. With a
//! target id, prints its bounded neighborhood and all shortest paths to each
//! member. An unknown id yields an error object, not a failure.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use chunklens::config::Config;
use chunklens::corpus::Corpus;
use chunklens::relations::RelationGraph;

/// Explore chunk-to-chunk relationships in a corpus
#[derive(Parser, Debug)]
#[command(name = "chunk-relations", version)]
struct Cli {
    /// Corpus file: JSON with a top-level "chunks" array, or JSON Lines
    chunks_file: PathBuf,

    /// Target chunk id; omit for the corpus-wide summary
    chunk_id: Option<String>,

    /// Neighborhood expansion depth around the target
    #[arg(long, default_value_t = 2)]
    depth: usize,

    /// Optional JSON config file
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
    // 1. Load config and corpus
    let config = Config::load(cli.config.as_deref());
    config.validate().context("invalid configuration")?;
    let corpus = Corpus::from_file(&cli.chunks_file)?;

    // 2. Build the relation graph
    let graph = RelationGraph::build(&corpus);

    // 3. Summary or neighborhood, depending on the arguments
    let output = match &cli.chunk_id {
        None => serde_json::to_string_pretty(&graph.summary(config.top_connected))?,
        Some(id) => match graph.explore(id, cli.depth) {
            Some(report) => serde_json::to_string_pretty(&report)?,
            None => serde_json::to_string_pretty(&json!({
                "error": format!("Chunk ID {id} not found")
            }))?,
        },
    };
    println!("{output}");

    Ok(())
}
