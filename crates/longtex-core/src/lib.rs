//! # longtex-core
//!
//! Core functionality for longtex - export a longform markdown note, with its
//! `![[embed]]` transclusions resolved, to LaTeX.
//!
//! ## Architecture
//!
//! - **Parsing**: tree-sitter based block parsing, heading tree and inline spans
//! - **Resolution**: recursive embed unrolling with a per-export note cache
//! - **Classification**: abstract, body and appendix regions of the root note
//! - **Rendering**: LaTeX for every node kind
//! - **Assembly**: template filling, standalone documents and selection export
//! - **Storage**: the [`DocumentStore`] seam with on-disk and in-memory stores
//!
//! ## Quick Start
//!
//! ```rust
//! use longtex_core::{ExportOptions, MemoryStore, RecordingNotifier, parse_longform};
//! use std::sync::Arc;
//!
//! # tokio_test_block_on(async {
//! let notifier = Arc::new(RecordingNotifier::new());
//! let store = MemoryStore::new(notifier.clone())
//!     .with_document("Paper.md", "---\ntitle: Paper\n---\n# Intro\n![[Methods]]\n")
//!     .with_document("Methods.md", "We measured *everything*.\n");
//!
//! let root = longtex_core::DocumentHandle::new("Paper.md");
//! let parsed = parse_longform(&store, &*notifier, &root, None, &ExportOptions::default()).await?;
//!
//! assert_eq!(parsed.body, "\\section{Intro}\nWe measured \\emph{everything}.\n\n");
//! # Ok::<(), longtex_core::Error>(())
//! # })?;
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! # Ok::<(), longtex_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Problems inside embedded notes
//! (missing files, missing headers) are reported through a [`Notifier`] and
//! never abort an export; a missing root note does.

/// Longform export and output writers
pub mod assemble;
/// Parsed-note cache
pub mod cache;
/// Abstract, body and appendix classification
pub mod classify;
/// Configuration management
pub mod config;
/// Error types and result aliases
pub mod error;
/// LaTeX escaping
pub mod escape;
/// YAML front-matter
pub mod frontmatter;
/// Heading tree construction and lookup
pub mod heading;
/// Inline markdown spans
pub mod inline;
/// Document node model
pub mod node;
/// User notices and clipboard sinks
pub mod notify;
/// Tree-sitter based markdown parser
pub mod parser;
/// LaTeX rendering
pub mod render;
/// Document stores
pub mod store;
/// Core data types and structures
pub mod types;
/// Embed resolution
pub mod unroll;

// Re-export commonly used types
pub use assemble::{
    ExportOptions, ExportRequest, export_file, export_selection, fill_template, join_sections,
    parse_longform, standalone_document, write_with_template, write_without_template,
};
pub use cache::NoteCache;
pub use classify::{Sections, classify_sections};
pub use config::{Config, DocumentConfig, ExportConfig};
pub use error::{Error, Result};
pub use node::{Header, Inline, Node};
pub use notify::{ClipboardSink, MemoryClipboard, Notifier, RecordingNotifier, TracingNotifier};
pub use parser::{MarkdownParser, parse_note};
pub use render::{Latex, render_nodes};
pub use store::{DocumentStore, MemoryStore, VaultStore};
pub use types::*;
pub use unroll::{HeaderFrame, UnrollContext, Unrolled};
