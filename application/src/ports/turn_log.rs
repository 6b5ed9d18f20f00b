//! Port for the append-only turn log.
//!
//! Defines the [`TurnLogger`] trait for recording every turn attempt
//! (successes, failures and director injections) to a durable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the transcript in a
//! machine-readable format (one JSON object per line).

use chrono::{DateTime, Utc};
use parley_domain::{AgentConfig, DIRECTOR_NAME, Message};
use serde::{Deserialize, Serialize};

/// Agent id recorded for director injections in the turn log.
pub const INJECTION_LOG_ID: &str = "user";

/// Content recorded for a reply that arrived while paused.
pub const DISCARDED: &str = "<DISCARDED>";

/// One line of the turn log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub ts: DateTime<Utc>,
    pub round: u32,
    pub agent_id: String,
    pub agent_name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl TurnRecord {
    /// A successful agent reply.
    pub fn reply(round: u32, agent: &AgentConfig, message: &Message) -> Self {
        Self {
            ts: message.timestamp,
            round,
            agent_id: agent.id().to_string(),
            agent_name: agent.name().to_string(),
            content: message.content.clone(),
            model: (!agent.is_human()).then(|| agent.model_name().to_string()),
        }
    }

    /// A failed attempt; content is `<ERROR: ...>`.
    pub fn failure(round: u32, agent: &AgentConfig, error: &str) -> Self {
        Self {
            ts: Utc::now(),
            round,
            agent_id: agent.id().to_string(),
            agent_name: agent.name().to_string(),
            content: format!("<ERROR: {}>", error),
            model: Some(agent.model_name().to_string()),
        }
    }

    /// A reply thrown away because the session was no longer running.
    pub fn discarded(round: u32, agent: &AgentConfig) -> Self {
        Self {
            ts: Utc::now(),
            round,
            agent_id: agent.id().to_string(),
            agent_name: agent.name().to_string(),
            content: DISCARDED.to_string(),
            model: Some(agent.model_name().to_string()),
        }
    }

    /// A director injection.
    pub fn injection(round: u32, message: &Message) -> Self {
        Self {
            ts: message.timestamp,
            round,
            agent_id: INJECTION_LOG_ID.to_string(),
            agent_name: DIRECTOR_NAME.to_string(),
            content: message.content.clone(),
            model: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.content.starts_with("<ERROR:")
    }

    pub fn is_discarded(&self) -> bool {
        self.content == DISCARDED
    }
}

/// Port for appending turn records.
///
/// `log` is synchronous and non-fallible; a failing log must not stop the
/// debate. Implementations report write errors through `tracing`.
pub trait TurnLogger: Send + Sync {
    fn log(&self, record: &TurnRecord);
}

/// No-op implementation for tests and when the turn log is disabled.
pub struct NoTurnLogger;

impl TurnLogger for NoTurnLogger {
    fn log(&self, _record: &TurnRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::InfluenceWeight;

    fn agent() -> AgentConfig {
        AgentConfig::new("skeptic", "Skeptic", "Doubt everything.").unwrap()
    }

    #[test]
    fn reply_record_carries_model() {
        let message = Message::from_agent(&agent(), "I doubt it.");
        let record = TurnRecord::reply(2, &agent(), &message);
        assert_eq!(record.round, 2);
        assert_eq!(record.agent_id, "skeptic");
        assert_eq!(record.content, "I doubt it.");
        assert_eq!(record.model.as_deref(), Some(parley_domain::DEFAULT_MODEL));
        assert!(!record.is_failure());
    }

    #[test]
    fn failure_record_wraps_error() {
        let record = TurnRecord::failure(1, &agent(), "timeout");
        assert_eq!(record.content, "<ERROR: timeout>");
        assert!(record.is_failure());
    }

    #[test]
    fn discarded_record_is_not_a_failure() {
        let record = TurnRecord::discarded(3, &agent());
        assert_eq!(record.content, "<DISCARDED>");
        assert_eq!(record.round, 3);
        assert!(record.is_discarded());
        assert!(!record.is_failure());
    }

    #[test]
    fn injection_record_uses_user_id() {
        let weight = InfluenceWeight::new(0.5).unwrap();
        let message = Message::injection("Focus.", weight);
        let record = TurnRecord::injection(1, &message);
        assert_eq!(record.agent_id, "user");
        assert_eq!(record.model, None);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"model\""));
        assert!(json.contains("\"ts\""));
    }
}
