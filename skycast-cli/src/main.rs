//! Binary crate for the `skycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and chart-metric selection
//! - Terminal presentation of the dashboard

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod screen;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
