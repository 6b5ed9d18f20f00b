//! Debate transcript entries

use crate::agent::config::AgentConfig;
use crate::core::weight::InfluenceWeight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender id used for every director injection.
pub const DIRECTOR_ID: &str = "director";
/// Display name used for every director injection.
pub const DIRECTOR_NAME: &str = "Director";

/// Role of a message in LLM context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single utterance in the debate history (Entity)
///
/// Messages are immutable once appended. Injected and agent-generated
/// messages differ only in `is_injection` and `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub sender_id: String,
    pub sender_name: String,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub influence_weight: InfluenceWeight,
    #[serde(default)]
    pub is_injection: bool,
}

impl Message {
    fn build(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            role,
            content: content.into(),
            influence_weight: InfluenceWeight::NONE,
            is_injection: false,
        }
    }

    /// A reply produced by an agent's turn.
    pub fn from_agent(agent: &AgentConfig, content: impl Into<String>) -> Self {
        Self::build(agent.id(), agent.name(), Role::Assistant, content)
    }

    /// A line typed by a human seated in the roster.
    pub fn from_human(agent: &AgentConfig, content: impl Into<String>) -> Self {
        Self::build(agent.id(), agent.name(), Role::User, content)
    }

    /// An out-of-band director intervention.
    pub fn injection(content: impl Into<String>, weight: InfluenceWeight) -> Self {
        Self {
            influence_weight: weight,
            is_injection: true,
            ..Self::build(DIRECTOR_ID, DIRECTOR_NAME, Role::User, content)
        }
    }

    /// A system notice (e.g. the opening topic).
    pub fn system(content: impl Into<String>) -> Self {
        Self::build("system", "System", Role::System, content)
    }
}
