//! Prompt shaping.
//!
//! - [`shader::shade`]: frames a director injection by weight
//! - [`turn::TurnPrompt`]: system + user prompt for one agent turn
//! - [`sanitize::sanitize_reply`]: strips leaked reasoning from replies

pub mod sanitize;
pub mod shader;
pub mod turn;
