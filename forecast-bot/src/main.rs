//! Binary crate for the `forecast-bot` Discord bot.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Logging setup
//! - The Discord gateway handler for `/forecast`

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod discord;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the variables directly.
    dotenvy::dotenv().ok();
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// `RUST_LOG` wins; otherwise info for everything.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
