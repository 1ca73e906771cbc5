//! CLI configuration loaded from `sieben.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sieben_goal::FocusPolicy;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sieben.toml";

/// Top-level configuration. Every field has a default, so an empty or
/// missing file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiebenConfig {
    /// SQLite database holding the goal graph.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// When set, every committed mutation's events are appended here as JSONL.
    #[serde(default)]
    pub events_log: Option<PathBuf>,

    /// Name given to the root goal of a fresh database.
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Move the cursor back to the root after closing a goal.
    #[serde(default = "default_return_to_root")]
    pub return_to_root_on_close: bool,

    /// Default tracing directive, combined with `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database() -> PathBuf {
    PathBuf::from("sieben.db")
}

fn default_root_name() -> String {
    "Rename me".to_string()
}

fn default_return_to_root() -> bool {
    true
}

fn default_log_filter() -> String {
    "sieben=info".to_string()
}

impl Default for SiebenConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            events_log: None,
            root_name: default_root_name(),
            return_to_root_on_close: default_return_to_root(),
            log_filter: default_log_filter(),
        }
    }
}

impl SiebenConfig {
    /// Parse a config file. Fails if the file is unreadable or malformed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn focus_policy(&self) -> FocusPolicy {
        if self.return_to_root_on_close {
            FocusPolicy::ReturnToRoot
        } else {
            FocusPolicy::Stay
        }
    }
}
