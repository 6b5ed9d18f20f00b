//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod debate_controller;
pub mod dispatch;
pub mod retry;
pub mod run_debate;
