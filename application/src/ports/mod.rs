//! Port definitions (interfaces for external systems)

pub mod completion;
pub mod debate_event;
pub mod director_input;
pub mod progress;
pub mod snapshot;
pub mod turn_log;
