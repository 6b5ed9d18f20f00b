//! Turn scheduler: the debate state machine.
//!
//! [`TurnScheduler`] is the sole owner of a [`DebateState`]. Controllers never
//! assign fields directly; they issue intents (`start`, `pause`, `resume`,
//! `advance_turn`, `append_message`, `inject_message`) which the scheduler
//! validates and applies.
//!
//! Turn advancement is deliberately separate from appending: an injected
//! director message lands in history without consuming anyone's turn.

use super::message::Message;
use super::state::{DebateState, DebateStatus};
use crate::agent::config::AgentConfig;
use crate::core::error::DomainError;
use crate::core::weight::InfluenceWeight;
use chrono::Utc;

/// Outcome of a single [`TurnScheduler::advance_turn`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// Moved to the next agent within the same round.
    Advanced,
    /// Wrapped to the first agent; carries the new `rounds_completed`.
    RoundCompleted(u32),
    /// The final round finished and the debate is now COMPLETED.
    Completed,
    /// Nothing changed (empty roster or already COMPLETED).
    Ignored,
}

/// Debate state machine (Aggregate Root)
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    state: DebateState,
}

impl TurnScheduler {
    /// Set up a new debate session in IDLE.
    pub fn new(
        topic: impl Into<String>,
        agents: Vec<AgentConfig>,
        max_rounds: u32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            state: DebateState::new(topic, agents, max_rounds)?,
        })
    }

    /// Adopt a previously saved state after checking its invariants.
    pub fn from_state(state: DebateState) -> Result<Self, DomainError> {
        state.validate()?;
        Ok(Self { state })
    }

    /// Read-only view of the session state.
    pub fn state(&self) -> &DebateState {
        &self.state
    }

    pub fn into_state(self) -> DebateState {
        self.state
    }

    pub fn status(&self) -> DebateStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.status == DebateStatus::Running
    }

    pub fn history(&self) -> &[Message] {
        &self.state.history
    }

    /// Transition to RUNNING.
    ///
    /// Requires at least one agent. Starting a PAUSED session resumes it;
    /// starting a COMPLETED session is an error.
    pub fn start(&mut self) -> Result<(), DomainError> {
        if self.state.agents.is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "Cannot start debate with 0 agents".to_string(),
            ));
        }
        match self.state.status {
            DebateStatus::Completed => Err(DomainError::SessionCompleted),
            DebateStatus::Running => Ok(()),
            DebateStatus::Idle | DebateStatus::Paused => {
                self.set_status(DebateStatus::Running);
                Ok(())
            }
        }
    }

    /// RUNNING → PAUSED. Returns whether the status changed.
    pub fn pause(&mut self) -> bool {
        if self.state.status == DebateStatus::Running {
            self.set_status(DebateStatus::Paused);
            return true;
        }
        false
    }

    /// PAUSED → RUNNING. Returns whether the status changed.
    pub fn resume(&mut self) -> bool {
        if self.state.status == DebateStatus::Paused {
            self.set_status(DebateStatus::Running);
            return true;
        }
        false
    }

    /// The agent whose turn it is, if the roster is non-empty.
    pub fn current_agent(&self) -> Option<&AgentConfig> {
        self.state.agents.get(self.state.current_turn_index)
    }

    /// Move the turn pointer to the next agent.
    ///
    /// Must be called exactly once per finished agent turn. Wrapping back to
    /// the first agent completes a round; reaching `max_rounds` completes
    /// the debate.
    pub fn advance_turn(&mut self) -> TurnAdvance {
        if self.state.agents.is_empty() || self.state.status.is_terminal() {
            return TurnAdvance::Ignored;
        }

        let next = (self.state.current_turn_index + 1) % self.state.agents.len();
        let mut outcome = TurnAdvance::Advanced;

        if next == 0 {
            self.state.rounds_completed += 1;
            outcome = TurnAdvance::RoundCompleted(self.state.rounds_completed);

            if self.state.rounds_completed >= self.state.max_rounds {
                self.set_status(DebateStatus::Completed);
                outcome = TurnAdvance::Completed;
            }
        }

        self.state.current_turn_index = next;
        outcome
    }

    /// Append a message to history. Does not touch the turn pointer.
    pub fn append_message(&mut self, message: Message) {
        self.state.history.push(message);
        self.touch();
    }

    /// Append a director intervention. Never advances the turn.
    pub fn inject_message(
        &mut self,
        content: impl Into<String>,
        weight: InfluenceWeight,
    ) -> &Message {
        self.append_message(Message::injection(content, weight));
        // Just pushed, so history is non-empty
        &self.state.history[self.state.history.len() - 1]
    }

    /// Whether the most recent history entry is a director injection.
    pub fn last_is_injection(&self) -> bool {
        self.state.history.last().is_some_and(|m| m.is_injection)
    }

    fn set_status(&mut self, status: DebateStatus) {
        self.state.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.state.last_updated = Utc::now();
    }
}
