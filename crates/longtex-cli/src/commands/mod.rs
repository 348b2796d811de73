//! Command implementations for the longtex CLI.

mod config;
mod export;
mod selection;

pub use config::show_config;
pub use export::export;
pub use selection::selection;
