//! Logging infrastructure: the append-only turn log.
//!
//! Provides [`JsonlTurnLogger`], a JSONL file writer that implements
//! the [`TurnLogger`](parley_application::TurnLogger) port.

mod jsonl_turn_log;

pub use jsonl_turn_log::JsonlTurnLogger;
