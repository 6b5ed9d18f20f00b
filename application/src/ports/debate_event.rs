//! Events emitted by DebateController for presentation layer rendering
//!
//! These events form the output port from the interactive controller to the
//! presentation layer. They are notifications only; the controller never
//! waits on their consumer.

use parley_domain::{DebateStatus, Message};
use std::path::PathBuf;

/// Events emitted by DebateController for the presentation layer to render
#[derive(Debug, Clone)]
pub enum DebateEvent {
    /// Session status changed
    StatusChanged { status: DebateStatus },

    // === Turns ===
    /// A completion was dispatched for an agent
    TurnStarted {
        agent_id: String,
        agent_name: String,
        round: u32,
    },
    /// Advisory streaming fragment for the in-flight turn
    Token { agent_id: String, fragment: String },
    /// A message (agent reply or director injection) was appended to history
    MessageAppended(Message),
    /// The in-flight turn failed; the session is now paused
    TurnFailed { agent_name: String, error: String },

    // === Progress ===
    /// A full pass through the roster finished
    RoundCompleted { rounds_completed: u32, max_rounds: u32 },
    /// The final round finished
    Completed { rounds_completed: u32 },

    // === Director feedback ===
    /// Snapshot written
    Saved { path: PathBuf },
    /// Informational line, e.g. a director command that could not be applied
    Notice { message: String },
}
