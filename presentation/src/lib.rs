//! Presentation layer for parley
//!
//! This crate contains CLI definitions, console rendering,
//! progress reporters, and director input.

pub mod cli;
pub mod director;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, DebateArgs, LiveArgs, RunArgs};
pub use director::{DirectorConsole, StdinDirector, spawn_stdin_lines};
pub use output::console::ConsoleFormatter;
pub use output::renderer::ConsoleRenderer;
pub use progress::reporter::{DebateProgressReporter, SimpleProgress};
