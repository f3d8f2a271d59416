//! Configuration persistence for the quiz app.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::ledger::GROUP_COUNT;

/// Application configuration that persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The currently selected theme name.
    #[serde(default = "default_theme")]
    pub theme: String,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Display names of the competing groups.
    #[serde(default = "default_group_labels")]
    pub group_labels: Vec<String>,
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_log_filter() -> String {
    "zq=info".to_string()
}

fn default_group_labels() -> Vec<String> {
    (1..=GROUP_COUNT).map(|n| n.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            log_filter: default_log_filter(),
            group_labels: default_group_labels(),
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zhuyin-quiz")
            .join("config.toml")
    }

    /// Load config from disk, returning default if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Label for group `index`, falling back to its 1-based number when the
    /// configured list is short.
    pub fn group_label(&self, index: usize) -> String {
        self.group_labels
            .get(index)
            .filter(|l| !l.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| (index + 1).to_string())
    }
}
