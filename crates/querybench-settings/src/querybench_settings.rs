//! QueryBench Settings
//!
//! Application settings persisted as JSON:
//! - Session settings (history size)
//! - Completion settings (extra keywords)
//! - Logging settings (filter, console and file output)
//! - Connection profiles

use anyhow::{Context, Result};
use querybench_core::ConnectionProfile;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueryBenchSettings {
    pub session: SessionSettings,
    pub completion: CompletionSettings,
    pub logging: LoggingSettings,
    pub connections: Vec<ConnectionProfile>,
}

impl QueryBenchSettings {
    /// Load from the default location, falling back to defaults when no
    /// settings file exists yet
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = ?path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings JSON in {:?}", path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn connection(&self, id: &str) -> Option<&ConnectionProfile> {
        self.connections.iter().find(|profile| profile.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Number of executions kept in history
    pub history_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { history_limit: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompletionSettings {
    /// Keywords offered in addition to the built-in list
    pub extra_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
    /// Pretty logs on stderr
    pub console: bool,
    /// Daily rolling JSON logs under the log directory
    pub json_file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            console: false,
            json_file: true,
        }
    }
}
