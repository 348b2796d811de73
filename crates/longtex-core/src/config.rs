//! Configuration management for longtex.
//!
//! Settings live in a single TOML file. The file is looked up in this order:
//!
//! 1. An explicit path passed to [`Config::load_from`] (the CLI's `--config`)
//! 2. The file named by the `LONGTEX_CONFIG` environment variable
//! 3. `config.toml` in the platform config directory
//!
//! A missing file yields the defaults.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [document]
//! class = "article"
//! bibliography = "bibliography.bib"
//! header_input = "header"
//!
//! [export]
//! template = "templates/paper.tex"
//! preamble = "preamble.sty"
//! max_embed_depth = 64
//! ```
//!
//! ## Loading
//!
//! ```rust
//! use longtex_core::{Config, Result};
//!
//! let config = Config::load()?;
//! println!("Document class: {}", config.document.class);
//! # Ok::<(), longtex_core::Error>(())
//! ```

use crate::assemble::ExportOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "LONGTEX_CONFIG";

/// Global longtex configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for standalone documents.
    pub document: DocumentConfig,
    /// Export defaults.
    pub export: ExportConfig,
}

/// Settings that shape a standalone `.tex` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Argument of `\documentclass{}`.
    pub class: String,
    /// Argument of `\addbibresource{}`.
    pub bibliography: String,
    /// Argument of the leading `\input{}`.
    pub header_input: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            class: "article".to_string(),
            bibliography: "bibliography.bib".to_string(),
            header_input: "header".to_string(),
        }
    }
}

/// Defaults for `longtex export`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Template used when none is given on the command line. Vault-relative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Preamble `\input{}` for standalone documents. Vault-relative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preamble: Option<PathBuf>,
    /// Maximum embed nesting. Absent means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_embed_depth: Option<usize>,
}

impl Config {
    /// Load from `LONGTEX_CONFIG` or the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::read(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an explicit path. Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::read(path)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save to the default location, creating parent directories.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Config("Invalid config path".into()))?;

        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;

        let content = self.to_toml()?;

        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;

        Ok(())
    }

    /// Pretty TOML rendering of the configuration.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))
    }

    /// Path of the config file: `LONGTEX_CONFIG` when set, otherwise
    /// `config.toml` in the platform config directory.
    ///
    /// - Linux: `~/.config/longtex/config.toml`
    /// - macOS: `~/Library/Application Support/dev.longtex.longtex/config.toml`
    /// - Windows: `%APPDATA%\longtex\longtex\config\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let project_dirs = directories::ProjectDirs::from("dev", "longtex", "longtex")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Export options derived from this configuration.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            document_class: self.document.class.clone(),
            bibliography: self.document.bibliography.clone(),
            header_input: self.document.header_input.clone(),
            max_embed_depth: self.export.max_embed_depth,
        }
    }
}
