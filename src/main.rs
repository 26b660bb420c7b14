//! mailrag CLI entry point.

use anyhow::Context;
use clap::Parser;

use mailrag::cli::commands;
use mailrag::cli::{handle_error, Cli, Commands};
use mailrag::infrastructure::config::ConfigLoader;
use mailrag::infrastructure::logging::LoggerImpl;
use mailrag::RagError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
    .map_err(RagError::from)
    .context("Failed to load configuration");
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(&err, cli.json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, cli.json),
    };

    let result = match cli.command {
        Commands::Chat { sources } => commands::chat::execute(&config, sources, cli.json).await,
        Commands::Ask { ref query, sources } => {
            commands::ask::execute(&config, query, sources, cli.json).await
        }
        Commands::History { limit } => commands::history::execute(&config, limit, cli.json).await,
        Commands::Inspect => commands::inspect::execute(&config, cli.json).await,
        Commands::Config => commands::config::execute(&config, cli.json),
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
