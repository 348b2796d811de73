//! # Utility Functions and Helpers
//!
//! Shared plumbing for the CLI commands:
//!
//! - [`logging`]: tracing subscriber and color control
//! - [`clipboard`]: OSC 52 clipboard sink
//! - [`notify`]: console notifier for export notices

pub mod clipboard;
pub mod logging;
pub mod notify;

pub use clipboard::Osc52Clipboard;
pub use logging::initialize_logging;
pub use notify::ConsoleNotifier;
