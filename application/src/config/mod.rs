//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`Pacing`]: delays between turns and after director injections
//! - [`RetryPolicy`]: exponential backoff for completion calls
//! - [`DebateSettings`]: everything a run mode reads, in one place

pub mod debate_settings;
pub mod pacing;

pub use debate_settings::DebateSettings;
pub use pacing::{Pacing, RetryPolicy, SettingsError};
