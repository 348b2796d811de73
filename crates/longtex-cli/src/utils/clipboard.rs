//! Clipboard support using OSC 52 escape sequences
//!
//! OSC 52 is a terminal escape sequence that allows applications to write to the system
//! clipboard. This works even over SSH connections and in terminal multiplexers like tmux.
//!
//! The format is: `\x1b]52;c;<base64_content>\x1b\\` or `\x1b]52;c;<base64_content>\x07`
//!
//! References:
//! - https://invisible-island.net/xterm/ctlseqs/ctlseqs.html#h3-Operating-System-Commands
//! - https://github.com/ojroques/vim-oscyank

use base64::{Engine, engine::general_purpose::STANDARD};
use longtex_core::{ClipboardSink, Error, Result};
use std::io::{self, Write};

/// Clipboard sink that writes an OSC 52 sequence to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl ClipboardSink for Osc52Clipboard {
    fn copy(&self, text: &str) -> Result<()> {
        write_sequence(&mut io::stderr(), text)
            .map_err(|e| Error::Clipboard(format!("Failed to write OSC 52 sequence: {e}")))
    }
}

/// The OSC 52 sequence that places `text` on the system clipboard.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text);
    // BEL terminator; some terminals don't support ST (\x1b\\)
    format!("\x1b]52;c;{encoded}\x07")
}

fn write_sequence(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}
