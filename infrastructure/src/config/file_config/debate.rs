//! `[debate]`, `[pacing]`, `[retry]` and `[repetition]` sections.

use serde::{Deserialize, Serialize};

/// Raw debate configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Debate topic; the CLI `--topic` flag overrides it
    pub topic: Option<String>,
    pub max_rounds: u32,
    /// Messages shown to agents in live mode
    pub history_window: usize,
    /// Messages shown to agents in batch mode
    pub batch_history_window: usize,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            topic: None,
            max_rounds: 50,
            history_window: 15,
            batch_history_window: 12,
        }
    }
}

/// Raw pacing configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePacingConfig {
    pub turn_delay_ms: u64,
    pub settle_delay_ms: u64,
}

impl Default for FilePacingConfig {
    fn default() -> Self {
        Self {
            turn_delay_ms: 1500,
            settle_delay_ms: 300,
        }
    }
}

/// Raw retry configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_tries: u32,
    pub initial_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_tries: 3,
            initial_delay_ms: 1000,
        }
    }
}

/// Raw repetition stop-rule configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRepetitionConfig {
    /// `0` disables the rule
    pub stop_on_repeat: usize,
    pub threshold: f64,
}

impl Default for FileRepetitionConfig {
    fn default() -> Self {
        Self {
            stop_on_repeat: 2,
            threshold: 0.88,
        }
    }
}
