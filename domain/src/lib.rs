//! Domain layer for parley
//!
//! This crate contains the debate model, the turn state machine and the
//! pure prompt-shaping functions. It has no dependencies on infrastructure
//! or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Turn and Round
//!
//! A **turn** is one agent producing one reply. A **round** is a full pass
//! through the roster. [`TurnScheduler`] owns the [`DebateState`] and is the
//! only place where turns advance and rounds are counted.
//!
//! ## Director Injection
//!
//! A human **director** may insert a message at any time. Injections are
//! appended to history without taking a turn slot. Their
//! [`InfluenceWeight`] decides how forcefully the next agent is told to
//! address them (see [`shade`]).

pub mod agent;
pub mod context;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use agent::{
    config::{AgentConfig, DEFAULT_MODEL, DEFAULT_TEMPERATURE},
    role_template::RoleTemplate,
};
pub use context::window::{format_transcript, format_transcript_recent_first, window};
pub use core::{
    error::{DomainError, ValidationError},
    text::preview,
    weight::InfluenceWeight,
};
pub use debate::{
    message::{DIRECTOR_ID, DIRECTOR_NAME, Message, Role},
    repetition::{RepetitionRule, similarity},
    scheduler::{TurnAdvance, TurnScheduler},
    state::{DebateState, DebateStatus},
};
pub use prompt::{
    sanitize::sanitize_reply,
    shader::{InfluenceTier, shade},
    turn::{ChatMessage, TurnPrompt},
};
pub use session::stream::StreamEvent;
