//! Serializable debate session state

use super::message::Message;
use crate::agent::config::AgentConfig;
use crate::core::error::{DomainError, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lifecycle of a debate session
///
/// `Idle → Running ⇄ Paused`, `Running → Completed`. Completed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebateStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl DebateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateStatus::Idle => "IDLE",
            DebateStatus::Running => "RUNNING",
            DebateStatus::Paused => "PAUSED",
            DebateStatus::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DebateStatus::Completed)
    }
}

impl std::fmt::Display for DebateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The total serializable state of a debate session
///
/// Mutated only through [`TurnScheduler`](super::scheduler::TurnScheduler).
/// A snapshot is the whole struct as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateState {
    pub topic: String,
    pub agents: Vec<AgentConfig>,
    pub history: Vec<Message>,
    pub status: DebateStatus,
    pub current_turn_index: usize,
    pub rounds_completed: u32,
    pub max_rounds: u32,
    pub last_updated: DateTime<Utc>,
}

impl DebateState {
    /// Create a fresh IDLE state. Fails on `max_rounds == 0` or duplicate agent ids.
    pub fn new(
        topic: impl Into<String>,
        agents: Vec<AgentConfig>,
        max_rounds: u32,
    ) -> Result<Self, ValidationError> {
        let state = Self {
            topic: topic.into(),
            agents,
            history: Vec::new(),
            status: DebateStatus::Idle,
            current_turn_index: 0,
            rounds_completed: 0,
            max_rounds,
            last_updated: Utc::now(),
        };
        state.validate()?;
        Ok(state)
    }

    /// Check structural invariants. Used on construction and after loading.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_rounds == 0 {
            return Err(ValidationError::MaxRounds);
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.id()) {
                return Err(ValidationError::DuplicateAgent(agent.id().to_string()));
            }
        }

        if !self.agents.is_empty() && self.current_turn_index >= self.agents.len() {
            return Err(ValidationError::TurnIndex {
                index: self.current_turn_index,
                agents: self.agents.len(),
            });
        }

        let reached_limit = self.rounds_completed >= self.max_rounds;
        if reached_limit != (self.status == DebateStatus::Completed) {
            return Err(ValidationError::StatusMismatch {
                status: self.status.to_string(),
                rounds: self.rounds_completed,
                max: self.max_rounds,
            });
        }

        Ok(())
    }

    /// Serialize as a pretty-printed JSON snapshot.
    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot, rejecting documents that break the invariants.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let state: DebateState = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }

    /// The round currently in progress, 1-based.
    pub fn current_round(&self) -> u32 {
        self.rounds_completed.saturating_add(1).min(self.max_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::weight::InfluenceWeight;

    fn agents() -> Vec<AgentConfig> {
        vec![
            AgentConfig::new("optimist", "Optimist", "Be upbeat.").unwrap(),
            AgentConfig::new("skeptic", "Skeptic", "Doubt everything.")
                .unwrap()
                .with_temperature(1.2)
                .unwrap(),
        ]
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = DebateState::new("AI regulation", agents(), 3).unwrap();
        assert_eq!(state.status, DebateStatus::Idle);
        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.rounds_completed, 0);
        assert!(state.history.is_empty());
        assert_eq!(state.current_round(), 1);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert_eq!(
            DebateState::new("t", agents(), 0).unwrap_err(),
            ValidationError::MaxRounds
        );
    }

    #[test]
    fn test_duplicate_agents_rejected() {
        let mut roster = agents();
        roster.push(roster[0].clone());
        assert!(matches!(
            DebateState::new("t", roster, 1),
            Err(ValidationError::DuplicateAgent(id)) if id == "optimist"
        ));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = DebateState::new("AI regulation", agents(), 3).unwrap();
        state.status = DebateStatus::Paused;
        state.current_turn_index = 1;
        state.rounds_completed = 2;
        state.history.push(Message::from_agent(&state.agents[0], "Opening"));
        state.history.push(Message::injection(
            "Talk about jobs",
            InfluenceWeight::new(0.5).unwrap(),
        ));

        let json = state.to_json().unwrap();
        let loaded = DebateState::from_json(&json).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_snapshot_round_trip_keeps_full_precision_floats() {
        let mut roster = agents();
        roster[0] = roster[0].clone().with_temperature(1.0669639705312521).unwrap();
        let mut state = DebateState::new("t", roster, 2).unwrap();
        state.history.push(Message::injection(
            "Precise",
            InfluenceWeight::new(0.723999461611966).unwrap(),
        ));

        let back = DebateState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(back.agents[0].temperature(), 1.0669639705312521);
        assert_eq!(back.history[0].influence_weight.value(), 0.723999461611966);
        assert_eq!(back, state);
    }

    #[test]
    fn test_status_serialized_uppercase() {
        let state = DebateState::new("t", agents(), 1).unwrap();
        let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert_eq!(value["status"], "IDLE");
    }

    #[test]
    fn test_corrupt_snapshot_rejected() {
        assert!(matches!(
            DebateState::from_json("{ not json"),
            Err(DomainError::Serialization(_))
        ));
    }

    #[test]
    fn test_out_of_range_turn_index_rejected() {
        let mut state = DebateState::new("t", agents(), 2).unwrap();
        state.current_turn_index = 5;
        let json = serde_json::to_string(&state).unwrap();
        assert!(matches!(
            DebateState::from_json(&json),
            Err(DomainError::Validation(ValidationError::TurnIndex { index: 5, agents: 2 }))
        ));
    }

    #[test]
    fn test_completed_status_must_match_rounds() {
        let mut state = DebateState::new("t", agents(), 2).unwrap();
        state.status = DebateStatus::Completed;
        assert!(matches!(
            state.validate(),
            Err(ValidationError::StatusMismatch { .. })
        ));
    }
}
