use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "lifeflow_activities";

/// What to do when the stored activities cannot be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptDataPolicy {
    /// Refuse to start; the stored payload is left untouched.
    #[default]
    Fail,
    /// Start from whatever can be kept: an empty list for an unreadable
    /// payload, and without the records whose category is unknown.
    Discard,
}

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub on_corrupt_data: CorruptDataPolicy,
    /// Database file. The platform data directory is used when unset.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_key: default_storage_key(),
            on_corrupt_data: CorruptDataPolicy::default(),
            database: None,
        }
    }
}

impl Config {
    /// Read the configuration at `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}.", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}.", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
