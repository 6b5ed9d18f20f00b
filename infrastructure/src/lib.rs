//! Infrastructure layer for parley
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading and
//! the role library.

pub mod config;
pub mod logging;
pub mod openrouter;
pub mod roles;
pub mod snapshot;

// Re-export commonly used types
pub use config::{ConfigError, ConfigIssue, ConfigLoader, FileAgentEntry, FileConfig, Severity};
pub use logging::JsonlTurnLogger;
pub use openrouter::{OpenRouterClient, OpenRouterConfig};
pub use roles::{RoleError, RoleLibrary};
pub use snapshot::JsonFileSnapshotStore;
