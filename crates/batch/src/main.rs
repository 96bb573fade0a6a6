use anyhow::{Context, Result};
use batch::{AppConfig, read_parties, run_batch, write_tables};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Harvest company profiles, annual accounts and ownership networks from a
/// public company registry.
#[derive(Parser, Debug)]
#[command(name = "registry-harvest")]
#[command(version)]
struct Cli {
    /// CSV file with a `name,party_id` header
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the three result tables
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of parallel workers (overrides the config file)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(workers) = cli.workers {
        config.concurrency.workers = workers;
    }
    config.validate()?;

    let parties = read_parties(&cli.input)?;
    info!(
        entities = parties.len(),
        workers = config.concurrency.workers,
        base_url = %config.fetch.base_url,
        "loaded input"
    );

    let started = Instant::now();
    let batch = run_batch(parties, config.concurrency.workers, || config.fetch_context()).await?;

    if batch.is_empty() {
        warn!("no records extracted, writing empty tables");
    }

    let paths = write_tables(&batch, &cli.output_dir)
        .with_context(|| format!("Failed to write results to {:?}", cli.output_dir))?;
    info!(
        tables = paths.len(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "run complete"
    );
    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
