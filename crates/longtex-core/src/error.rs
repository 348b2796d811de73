//! Error types and handling for longtex-core operations.
//!
//! Only a handful of failures are fatal for an export: a missing root note, an
//! unreadable template, or an output that cannot be written. Everything that
//! goes wrong while resolving embeds is reported through a
//! [`Notifier`](crate::Notifier) instead and never reaches this type.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading notes and templates, writing output
//! - **Parse Errors**: markdown and front-matter parsing
//! - **Not Found**: the requested root note or template is absent
//! - **Configuration Errors**: invalid or unreadable config files
//! - **Template Errors**: placeholder patterns that cannot be compiled
//! - **Clipboard Errors**: the clipboard sink rejected the text
//!
//! ```rust
//! use longtex_core::{Error, Result};
//!
//! fn handle(result: Result<()>) {
//!     match result {
//!         Err(e) if e.is_recoverable() => eprintln!("retry: {e}"),
//!         Err(e) => eprintln!("{} error: {e}", e.category()),
//!         Ok(()) => {},
//!     }
//! }
//!
//! handle(Err(Error::NotFound("File not found: paper".into())));
//! ```

use thiserror::Error;

/// The main error type for longtex-core operations.
///
/// All fallible public functions return `Result<T, Error>`. `Display` gives a
/// user-facing message; the source chain is preserved for I/O errors.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading notes, templates and config files, and writing the
    /// exported `.tex` output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing operation failed.
    ///
    /// Raised when the markdown grammar cannot be loaded or a document cannot
    /// be turned into a syntax tree.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested resource was not found.
    ///
    /// Fatal only for the root note of an export and for templates; missing
    /// embed targets are warnings.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed (YAML, TOML, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A template placeholder could not be substituted.
    #[error("Template error: {0}")]
    Template(String),

    /// The clipboard sink refused the exported text.
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::Template(err.to_string())
    }
}

impl Error {
    /// Check if the error might go away if the operation is retried.
    ///
    /// Only interrupted or timed-out I/O qualifies; everything else is a
    /// property of the input.
    ///
    /// ```rust
    /// use longtex_core::Error;
    /// use std::io;
    ///
    /// assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "eintr")).is_recoverable());
    /// assert!(!Error::Parse("bad".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a static identifier for logging.
    ///
    /// - `"io"`, `"parse"`, `"not_found"`, `"config"`, `"serialization"`,
    ///   `"template"`, `"clipboard"`
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::NotFound(_) => "not_found",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Template(_) => "template",
            Self::Clipboard(_) => "clipboard",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::unnecessary_wraps)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        // Given: Different error variants
        let cases = vec![
            (Error::Parse("invalid syntax".to_string()), "Parse error: invalid syntax"),
            (Error::NotFound("File not found: paper".to_string()), "Not found: File not found: paper"),
            (Error::Config("missing field".to_string()), "Configuration error: missing field"),
            (Error::Template("bad pattern".to_string()), "Template error: bad pattern"),
            (Error::Clipboard("denied".to_string()), "Clipboard error: denied"),
        ];

        // Then: Display should match the documented format
        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();

        match error {
            Error::Io(ref inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
                assert!(error.to_string().contains("file not found"));
            },
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("a: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert_eq!(error.category(), "serialization");
    }

    #[test]
    fn test_error_from_regex_error() {
        let regex_error = regex::Regex::new("(").unwrap_err();
        let error: Error = regex_error.into();
        assert_eq!(error.category(), "template");
    }

    #[test]
    fn test_error_categories() {
        let cases = vec![
            (Error::Io(io::Error::other("x")), "io"),
            (Error::Parse("x".into()), "parse"),
            (Error::NotFound("x".into()), "not_found"),
            (Error::Config("x".into()), "config"),
            (Error::Serialization("x".into()), "serialization"),
            (Error::Template("x".into()), "template"),
            (Error::Clipboard("x".into()), "clipboard"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected, "wrong category for {error:?}");
        }
    }

    #[test]
    fn test_error_recoverability() {
        assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow")).is_recoverable());
        assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "eintr")).is_recoverable());
        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone")).is_recoverable());
        assert!(!Error::NotFound("paper".into()).is_recoverable());
        assert!(!Error::Template("x".into()).is_recoverable());
    }

    proptest! {
        #[test]
        fn test_parse_error_with_arbitrary_messages(msg in r".{0,200}") {
            let error = Error::Parse(msg.clone());
            let display = error.to_string();
            prop_assert!(display.starts_with("Parse error: "));
            prop_assert!(display.contains(&msg));
        }
    }
}
