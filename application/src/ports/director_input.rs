//! Director input port for batch runs
//!
//! In batch mode the director is consulted synchronously between turns,
//! and answers for the human seat (agent id `user`) when it comes up.

use async_trait::async_trait;
use parley_domain::{AgentConfig, InfluenceWeight};

/// What the director wants after a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorDecision {
    /// Carry on with the next turn.
    Continue,
    /// Insert a weighted message before the next turn.
    Inject {
        content: String,
        weight: InfluenceWeight,
    },
    /// End the run now.
    Quit,
}

#[async_trait]
pub trait DirectorInput: Send + Sync {
    /// Asked after every successful turn.
    async fn after_turn(&self) -> DirectorDecision;

    /// Reply for the human seat. `None` means the human skipped.
    async fn human_turn(&self, agent: &AgentConfig) -> Option<String>;
}

/// Never intervenes and skips the human seat.
pub struct NonInteractive;

#[async_trait]
impl DirectorInput for NonInteractive {
    async fn after_turn(&self) -> DirectorDecision {
        DirectorDecision::Continue
    }

    async fn human_turn(&self, _agent: &AgentConfig) -> Option<String> {
        None
    }
}
