//! rsys CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use rsys::cli::{self, commands, Cli, Commands};
use rsys::infrastructure::config::ConfigLoader;
use rsys::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        cli::handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let log_config = LogConfig::try_from(&config.logging)?;
    // Dropping the logger flushes buffered file output
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    let client = Arc::new(
        cli::connect(&config, cli.user_name.as_deref(), cli.password.as_deref()).await?,
    );

    match cli.command {
        Commands::Auth(args) => commands::auth::execute(args, &client, cli.json).await,
        Commands::ThrottleLimits => commands::throttle::execute(&client, cli.json).await,
        Commands::Campaign(args) => {
            commands::campaign::execute(args, &client, &config, cli.json).await
        }
        Commands::Program(args) => {
            commands::program::execute(args, &client, &config, cli.json).await
        }
        Commands::Export(args) => commands::export::execute(args, client, cli.json).await,
    }
}
