//! Application layer for parley
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.
//!
//! Two run modes share one [`CompletionDispatcher`]:
//!
//! - [`DebateController`]: event-driven, steered live by a director
//! - [`RunDebateUseCase`]: a sequential batch loop

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DebateSettings, Pacing, RetryPolicy, SettingsError};
pub use ports::{
    completion::{CompletionError, CompletionRequest, CompletionService, StreamHandle},
    debate_event::DebateEvent,
    director_input::{DirectorDecision, DirectorInput, NonInteractive},
    progress::{DebateProgressNotifier, NoProgress},
    snapshot::{SnapshotError, SnapshotStore},
    turn_log::{NoTurnLogger, TurnLogger, TurnRecord},
};
pub use use_cases::debate_controller::{
    ControllerError, DebateController, DirectorCommand, DirectorHandle,
};
pub use use_cases::dispatch::{
    CompletionDispatcher, DispatchError, DispatchEvent, TokenSink, TurnTicket,
};
pub use use_cases::retry::retry_with_backoff;
pub use use_cases::run_debate::{
    HUMAN_SKIPPED, RunDebateError, RunDebateInput, RunDebateOutput, RunDebateUseCase, StopReason,
};
