//! # CLI Structure and Argument Parsing
//!
//! The command-line interface for `longtex`, built with `clap` derive macros.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Export a note (and everything it embeds) next to the note
//! longtex --vault ~/notes export "My Paper"
//!
//! # Fill a template instead of writing a standalone document
//! longtex export "My Paper" --template templates/paper.tex
//!
//! # Export a pasted selection to the clipboard
//! pbpaste | longtex selection "My Paper"
//!
//! # Show the effective configuration
//! longtex config
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `longtex` command
#[derive(Parser, Clone, Debug)]
#[command(name = "longtex")]
#[command(version)]
#[command(about = "longtex - Export longform markdown notes to LaTeX", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (overrides autodiscovery). Also via `LONGTEX_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "LONGTEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Vault directory that notes are looked up in
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub vault: PathBuf,
}

/// Available subcommands for the `longtex` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Export a note to a `.tex` file
    Export(ExportArgs),

    /// Export a selection of a note and copy the LaTeX to the clipboard
    Selection(SelectionArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Clone, Debug)]
pub struct ExportArgs {
    /// Note name (file stem) or vault-relative folder path
    pub note: String,

    /// Template file, relative to the vault
    #[arg(long, value_name = "FILE", conflicts_with = "no_template")]
    pub template: Option<PathBuf>,

    /// Ignore any configured template and write a standalone document
    #[arg(long)]
    pub no_template: bool,

    /// Preamble file to `\input{}` in standalone documents
    #[arg(long, value_name = "FILE")]
    pub preamble: Option<PathBuf>,

    /// Output file, relative to the vault (default: the note's path with `.tex`)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print a JSON summary instead of the output path
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone, Debug)]
pub struct SelectionArgs {
    /// Note the selection was taken from
    pub note: String,

    /// Read the selection from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Print the LaTeX instead of copying it to the clipboard
    #[arg(long)]
    pub stdout: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "longtex",
            "--vault",
            "/notes",
            "export",
            "Paper",
            "--template",
            "t.tex",
            "-o",
            "out/paper.tex",
        ])
        .unwrap();

        assert_eq!(cli.vault, PathBuf::from("/notes"));
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.note, "Paper");
                assert_eq!(args.template, Some(PathBuf::from("t.tex")));
                assert_eq!(args.output, Some(PathBuf::from("out/paper.tex")));
                assert!(!args.no_template);
            },
            other => panic!("expected export, got {other:?}"),
        }
    }

    #[test]
    fn test_template_conflicts_with_no_template() {
        let result = Cli::try_parse_from(["longtex", "export", "Paper", "--template", "t.tex", "--no-template"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["longtex", "selection", "Paper", "--stdout", "-q"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.vault, PathBuf::from("."));
        assert!(matches!(cli.command, Commands::Selection(SelectionArgs { stdout: true, .. })));
    }
}
