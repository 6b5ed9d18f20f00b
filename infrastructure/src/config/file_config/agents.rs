//! `[[agents]]` entries.
//!
//! ```toml
//! [[agents]]
//! role = "skeptic"            # load roles/skeptic.txt
//! model = "openai/gpt-4o"
//!
//! [[agents]]
//! id = "optimist"
//! name = "The Optimist"
//! system_prompt = "You see the upside in everything."
//! temperature = 0.9
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One roster seat as written in TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentEntry {
    /// Defaults to `role` when a role is given
    pub id: Option<String>,
    /// Defaults to the role's display name
    pub name: Option<String>,
    /// Role template id from the role library
    pub role: Option<String>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<PathBuf>,
    pub temperature: Option<f64>,
    pub model: Option<String>,
    /// `#RRGGBB` used when rendering this agent's name
    pub avatar_color: Option<String>,
}

impl FileAgentEntry {
    /// Id used in messages and validation output.
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.role.as_deref())
            .unwrap_or("<unnamed>")
    }

    pub fn from_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Self::default()
        }
    }
}
