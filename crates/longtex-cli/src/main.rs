//! longtex CLI - Export longform markdown notes to LaTeX
//!
//! This is the main entry point for the longtex command-line interface.
//! Argument handling and command dispatch live in the library crate.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    longtex_cli::run().await
}
