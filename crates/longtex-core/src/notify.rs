//! User-facing notices.
//!
//! Export problems that should not abort the run (missing embeds, duplicate
//! names) are reported through a [`Notifier`]. The CLI logs them; tests record
//! them. Selection exports hand their text to a [`ClipboardSink`].

use crate::Result;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Sink for non-fatal export messages.
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
}

/// Forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn info(&self, message: &str) {
        info!("{message}");
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    warnings: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn info(&self, message: &str) {
        self.infos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Destination for exported selection text.
pub trait ClipboardSink: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// Clipboard that keeps the last copied text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.warn("first");
        notifier.info("done");
        notifier.warn("second");

        assert_eq!(notifier.warnings(), vec!["first", "second"]);
        assert_eq!(notifier.infos(), vec!["done"]);
    }

    #[test]
    fn test_memory_clipboard_keeps_last_copy() {
        let clipboard = MemoryClipboard::new();
        assert!(clipboard.contents().is_none());
        clipboard.copy("first").unwrap();
        clipboard.copy("second").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("second"));
    }

    #[test]
    fn test_notifier_is_object_safe() {
        let notifier: &dyn Notifier = &TracingNotifier;
        notifier.warn("logged, not recorded");
    }
}
