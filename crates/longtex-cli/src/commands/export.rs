//! `longtex export`: write a note and its embeds to a `.tex` file.

use anyhow::{Context, Result};
use colored::Colorize;
use longtex_core::{Config, DocumentHandle, ExportRequest, ParsedLongform, VaultStore, export_file};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::ExportArgs;
use crate::utils::ConsoleNotifier;

/// Machine-readable result of an export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportSummary {
    output: PathBuf,
    media_files: Vec<PathBuf>,
    bib_keys: Vec<String>,
}

impl ExportSummary {
    fn new(vault: &Path, output: &DocumentHandle, parsed: ParsedLongform) -> Self {
        Self {
            output: vault.join(&output.path),
            media_files: parsed.media_files.into_iter().map(|media| media.path).collect(),
            bib_keys: parsed.bib_keys,
        }
    }
}

/// Build the export request from arguments, falling back to the config.
fn build_request(args: &ExportArgs, config: &Config) -> ExportRequest {
    let template = if args.no_template {
        None
    } else {
        args.template.clone().or_else(|| config.export.template.clone())
    };

    ExportRequest {
        template,
        preamble: args.preamble.clone().or_else(|| config.export.preamble.clone()),
        output: args.output.clone(),
        options: config.export_options(),
    }
}

/// Execute the export command.
pub async fn export(args: &ExportArgs, vault: &Path, config: &Config, quiet: bool) -> Result<()> {
    // Notices go to stderr, so they stay visible next to the JSON summary
    let notifier = Arc::new(ConsoleNotifier::new(quiet));
    let store = VaultStore::new(vault, notifier.clone());
    let request = build_request(args, config);

    let (output, parsed) = export_file(&store, &*notifier, &args.note, &request)
        .await
        .with_context(|| format!("Failed to export '{}'", args.note))?;

    if args.json {
        let summary = ExportSummary::new(vault, &output, parsed);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !quiet {
        println!(
            "{} Exported {} to {}",
            "✓".green(),
            args.note.bold(),
            vault.join(&output.path).display()
        );
    }

    Ok(())
}
