//! `[provider]` section: the completion endpoint.

use serde::{Deserialize, Serialize};

/// Raw provider configuration from TOML
///
/// The API key itself never lives in the file; `api_key_env` names the
/// environment variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub base_url: String,
    pub api_key_env: String,
    /// Model for agents without their own `model`
    pub default_model: String,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            default_model: parley_domain::DEFAULT_MODEL.to_string(),
            max_tokens: Some(512),
            timeout_seconds: 120,
        }
    }
}
