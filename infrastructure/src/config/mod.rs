//! Configuration file loading for parley
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PARLEY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./parley.toml` or `./.parley.toml`
//! 4. Global: `<config dir>/parley/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod issue;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileAgentEntry, FileConfig, FileDebateConfig, FileLoggingConfig, FilePacingConfig,
    FileProviderConfig, FileRepetitionConfig, FileRetryConfig, FileRolesConfig,
};
pub use issue::{ConfigIssue, Severity};
pub use loader::{ConfigLoader, ENV_PREFIX};
