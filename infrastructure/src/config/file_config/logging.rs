//! `[logging]` and `[roles]` sections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Append-only JSONL turn log; `None` disables it
    pub turn_log: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            turn_log: Some(PathBuf::from("data/debates.jsonl")),
        }
    }
}

/// Raw role library configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRolesConfig {
    pub dir: PathBuf,
}

impl Default for FileRolesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("roles"),
        }
    }
}
