//! Ports Ingest - load a ports document from the command line

use anyhow::{Context, Result};
use clap::Parser;
use ports_common::logging::{init_logging, LogConfig, LogLevel};
use ports_ingest::{FileReader, IngestOrchestrator, PortStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ports-ingest")]
#[command(author, version, about = "Load a ports JSON document into memory and report what was read")]
struct Cli {
    /// Ports document to ingest
    #[arg(short, long, env = "PORTS_FILE", default_value = "ports.json")]
    file: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flags
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("ports-ingest")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    let store = Arc::new(PortStore::new());
    let orchestrator = IngestOrchestrator::builder()
        .source(Arc::new(FileReader::new(cli.file.clone())?))
        .repository(store.clone())
        .build()?;

    let stats = orchestrator
        .run()
        .await
        .with_context(|| format!("Failed to ingest {}", cli.file.display()))?;

    info!(
        ports_upserted = stats.ports_upserted,
        distinct_ports = store.len(),
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "Ingestion complete"
    );
    Ok(())
}
