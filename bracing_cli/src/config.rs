//! CLI configuration with layered lookup
//!
//! 1. Built-in defaults
//! 2. `bracing.toml` from `--config`, or the user config directory
//! 3. Environment `BRACING_CATALOG`, `BRACING_FORMAT` (read by clap with
//!    the matching flags, so they beat the file)
//!
//! `RUST_LOG` takes precedence over `[log] level` when set.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "bracing.toml";

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. "warn" or "bracing_core=debug"
    pub level: String,

    /// Emit JSON log lines instead of text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Catalog used when `--catalog` is not given
    pub catalog: Option<PathBuf>,

    /// Report format used when `--format` is not given
    pub format: Option<OutputFormat>,

    pub log: LogConfig,
}

impl Config {
    /// Load configuration. An explicit path must exist; the user config
    /// file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::global_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bracing").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}
