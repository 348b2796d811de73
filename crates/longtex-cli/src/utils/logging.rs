//! Logging initialization and configuration.
//!
//! This module handles setting up the tracing subscriber and color control
//! based on CLI flags and environment variables.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};

/// Initialize the logging subsystem based on CLI flags.
///
/// JSON export output raises the level to ERROR unless verbose. Export
/// notices (missing embeds, duplicate names) bypass this and are printed by
/// [`ConsoleNotifier`](crate::utils::ConsoleNotifier).
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let machine_output = is_machine_output(cli);
    let level = log_level(cli, machine_output);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Color control: disable when requested, NO_COLOR is set, or when emitting machine output
    let env_no_color = std::env::var("NO_COLOR").ok().is_some();
    if cli.no_color || env_no_color || machine_output {
        color_control::set_override(false);
    }
    Ok(())
}

fn is_machine_output(cli: &Cli) -> bool {
    matches!(&cli.command, Commands::Export(args) if args.json)
}

fn log_level(cli: &Cli, machine_output: bool) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || machine_output {
        Level::ERROR
    } else {
        Level::WARN
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_default_level_shows_warnings() {
        let cli = parse(&["longtex", "export", "Paper"]);
        assert_eq!(log_level(&cli, is_machine_output(&cli)), Level::WARN);
    }

    #[test]
    fn test_json_output_silences_warnings() {
        let cli = parse(&["longtex", "export", "Paper", "--json"]);
        assert!(is_machine_output(&cli));
        assert_eq!(log_level(&cli, true), Level::ERROR);
    }

    #[test]
    fn test_verbose_wins_over_json() {
        let cli = parse(&["longtex", "-v", "export", "Paper", "--json"]);
        assert_eq!(log_level(&cli, is_machine_output(&cli)), Level::DEBUG);
    }

    #[test]
    fn test_quiet_level() {
        let cli = parse(&["longtex", "--quiet", "config"]);
        assert_eq!(log_level(&cli, is_machine_output(&cli)), Level::ERROR);
    }
}
