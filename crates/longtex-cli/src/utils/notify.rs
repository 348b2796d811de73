use colored::Colorize;
use longtex_core::Notifier;
use std::io::Write;
use tracing::debug;

/// Prints export notices to stderr, independent of the log level.
///
/// Warnings stay visible with `--json` since they never touch stdout. Only
/// `--quiet` silences them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn emit(&self, out: &mut impl Write, label: &str, message: &str) {
        if !self.quiet {
            let _ = writeln!(out, "{label} {message}");
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn warn(&self, message: &str) {
        debug!("warning: {message}");
        self.emit(&mut std::io::stderr(), &"Warning:".yellow().to_string(), message);
    }

    fn info(&self, message: &str) {
        debug!("{message}");
        self.emit(&mut std::io::stderr(), &"✓".green().to_string(), message);
    }
}
