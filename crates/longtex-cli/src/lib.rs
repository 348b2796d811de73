//! longtex CLI - Export longform markdown notes to LaTeX
//!
//! Parses arguments, sets up logging, loads configuration and hands off to
//! the command modules.
use anyhow::{Context, Result};
use clap::Parser;
use longtex_core::Config;

mod cli;
mod commands;
mod utils;

use crate::utils::initialize_logging;
use cli::{Cli, Commands};

/// Execute the longtex CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if logging setup, configuration loading or the command fails.
pub async fn run() -> Result<()> {
    // Convert Broken pipe panics into a clean exit
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe") || msg.contains("broken pipe") {
            std::process::exit(0);
        }
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = load_config(&cli)?;

    execute_command(cli, config).await
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

async fn execute_command(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Export(args) => commands::export(&args, &cli.vault, &config, cli.quiet).await,
        Commands::Selection(args) => commands::selection(&args, &cli.vault, &config, cli.quiet).await,
        Commands::Config => commands::show_config(&config),
    }
}
