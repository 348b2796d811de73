//! `longtex selection`: export a fragment of a note.
//!
//! The fragment is parsed as if it were the whole note, so embeds and headers
//! inside it resolve against the vault exactly as in a full export.

use anyhow::{Context, Result, anyhow};
use longtex_core::{
    Config, DocumentStore, VaultStore, export_selection, join_sections, parse_longform,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use crate::cli::SelectionArgs;
use crate::utils::{ConsoleNotifier, Osc52Clipboard};

async fn read_selection(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read selection from {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read selection from stdin")?;
            Ok(text)
        },
    }
}

/// Execute the selection command.
pub async fn selection(args: &SelectionArgs, vault: &Path, config: &Config, quiet: bool) -> Result<()> {
    let notifier = Arc::new(ConsoleNotifier::new(quiet));
    let store = VaultStore::new(vault, notifier.clone());
    let root = store
        .find(&args.note)
        .ok_or_else(|| anyhow!("File not found: {}", args.note))?;

    let text = read_selection(args.input.as_deref()).await?;
    let options = config.export_options();

    if args.stdout {
        let parsed = parse_longform(&store, &*notifier, &root, Some(&text), &options).await?;
        print!("{}", join_sections(&parsed));
    } else {
        export_selection(&store, &*notifier, &root, &text, &Osc52Clipboard, &options).await?;
    }

    Ok(())
}
