//! Progress notification port
//!
//! Defines the interface for reporting progress during a batch debate run.

use parley_domain::{AgentConfig, DebateState, Message};

/// Callback for progress updates during a batch run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, spinner, plain log lines).
pub trait DebateProgressNotifier: Send + Sync {
    /// Called once before the first turn.
    fn on_debate_start(&self, state: &DebateState);

    /// Called when a new round begins (1-based).
    fn on_round_start(&self, round: u32, max_rounds: u32);

    /// Called before an agent is asked for a reply.
    fn on_turn_start(&self, agent: &AgentConfig, round: u32);

    /// Called after a reply has been appended to history.
    fn on_turn_complete(&self, agent: &AgentConfig, message: &Message);

    /// Called when a turn failed after all retries.
    fn on_turn_failed(&self, agent: &AgentConfig, error: &str);

    // ==================== Optional Callbacks ====================

    /// Called after the director injected a message.
    fn on_injection(&self, _message: &Message) {}

    /// Called when the debate stopped because replies started repeating.
    fn on_repetition(&self, _repeats: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_debate_start(&self, _state: &DebateState) {}
    fn on_round_start(&self, _round: u32, _max_rounds: u32) {}
    fn on_turn_start(&self, _agent: &AgentConfig, _round: u32) {}
    fn on_turn_complete(&self, _agent: &AgentConfig, _message: &Message) {}
    fn on_turn_failed(&self, _agent: &AgentConfig, _error: &str) {}
}
