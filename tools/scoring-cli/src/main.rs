//! Scoring CLI
//!
//! Loads a fact snapshot, runs one scoring engine operation and prints the
//! result as JSON on stdout.

mod cli;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use scoring_engine::{JsonFileLoader, ScoringEngine};
use tracing::info;

use crate::cli::{Cli, CliHandler};

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::initialize_logging(&config.logging.level, &config.logging.format)?;

    info!("Starting scoring-cli v{} (engine v{})", env!("CARGO_PKG_VERSION"), scoring_engine::VERSION);

    let engine = ScoringEngine::new(config.scoring);
    let loader = JsonFileLoader::new(&cli.snapshot);
    let snapshot = engine
        .load(&loader)
        .with_context(|| format!("Failed to load snapshot: {:?}", cli.snapshot))?;

    let handler = CliHandler::new(engine, snapshot);
    let output = handler.handle_command(&cli.command)?;
    println!("{}", output);

    Ok(())
}
