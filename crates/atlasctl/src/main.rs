//! Atlas Doctor - connectivity diagnostics for MongoDB deployments
//!
//! Probes DNS (direct hostname + SRV service discovery) and the driver
//! connection path, printing a human-readable transcript of each step.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use atlasctl::cli::{Cli, Commands};
use atlasctl::commands;
use atlasctl::errors::EXIT_SUCCESS;

#[tokio::main]
async fn main() -> Result<()> {
    // Transcript output stays clean unless RUST_LOG raises the level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Debug { host, json } => {
            commands::debug(cli.uri, cli.config, cli.timeout_ms, host, json).await?
        }
        Commands::Test => commands::test(cli.uri, cli.config, cli.timeout_ms).await?,
        Commands::Dns { host } => commands::dns(&host).await?,
    };

    if exit_code != EXIT_SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}
