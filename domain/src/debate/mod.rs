//! Debate session domain.
//!
//! - [`state::DebateState`]: serializable session snapshot
//! - [`scheduler::TurnScheduler`]: the state machine that owns it
//! - [`message::Message`]: a single transcript entry
//! - [`repetition::RepetitionRule`]: stop rule for looping debates

pub mod message;
pub mod repetition;
pub mod scheduler;
pub mod state;
