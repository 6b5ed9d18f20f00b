//! Director input: the live console and the between-turns prompt.

pub mod commands;
pub mod live;
pub mod prompt;

pub use commands::{ConsoleCommand, DEFAULT_INJECTION_WEIGHT, parse_batch_line, parse_console_line};
pub use live::{DirectorConsole, spawn_stdin_lines};
pub use prompt::StdinDirector;
