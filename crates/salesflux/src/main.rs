use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use salesflux_core::config::PipelineConfig;
use salesflux_core::pipeline::{self, RunOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Load data/sales_data.csv, chart revenue by product and region, and write a markdown report",
    long_about = None
)]
struct Cli {}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    let Cli {} = Cli::parse();

    let config = PipelineConfig::default();
    config
        .outputs
        .prepare()
        .context("failed to create output directories")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match pipeline::run(&config, &mut out).context("sales pipeline failed")? {
        RunOutcome::Completed(summary) => {
            let summary = serde_json::to_string(&summary).context("failed to encode run summary")?;
            info!(%summary, "run complete");
        }
        RunOutcome::LoadFailed(err) => {
            info!(not_found = err.is_not_found(), "run ended without outputs");
        }
    }

    Ok(())
}
