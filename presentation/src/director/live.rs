//! Live director console: reads commands from stdin while the debate runs.

use super::commands::{ConsoleCommand, parse_console_line};
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use parley_application::{DirectorCommand, DirectorHandle};
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::debug;

/// Read stdin on a dedicated thread, forwarding each line.
///
/// The thread ends at end of input or when the receiver is dropped. It is
/// never joined, so a pending read does not hold up process exit.
pub fn spawn_stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("stdin closed: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Forwards typed commands to the controller.
pub struct DirectorConsole {
    handle: DirectorHandle,
}

impl DirectorConsole {
    pub fn new(handle: DirectorHandle) -> Self {
        Self { handle }
    }

    pub fn print_help() {
        println!("{}", "Director commands:".cyan().bold());
        println!("  {}            pause after the current turn", "/pause".yellow());
        println!("  {}           resume (retries the agent after a failure)", "/resume".green());
        println!("  {}  inject with weight w in [0, 1]", "/inject <w> <text>".magenta());
        println!("  {}     write a snapshot", "/save <path>".cyan());
        println!("  {}             stop", "/quit".red());
        println!("  any other text     inject with weight 0.5");
    }

    /// Forward lines until `/quit` or end of input, then stop the controller.
    pub async fn run(self, mut lines: mpsc::UnboundedReceiver<String>) {
        while let Some(line) = lines.recv().await {
            match parse_console_line(&line) {
                Ok(ConsoleCommand::Help) => Self::print_help(),
                Ok(ConsoleCommand::Quit) => break,
                Ok(command) => {
                    if let Some(command) = to_director_command(command)
                        && self.handle.send(command).is_err()
                    {
                        // Controller already stopped.
                        return;
                    }
                }
                Err(message) => println!("{}", ConsoleFormatter::notice(&message)),
            }
        }
        debug!("Director console finished");
        let _ = self.handle.stop();
    }
}

fn to_director_command(command: ConsoleCommand) -> Option<DirectorCommand> {
    match command {
        ConsoleCommand::Pause => Some(DirectorCommand::Pause),
        ConsoleCommand::Resume => Some(DirectorCommand::Resume),
        ConsoleCommand::Inject { weight, content } => {
            Some(DirectorCommand::Inject { content, weight })
        }
        ConsoleCommand::Save(path) => Some(DirectorCommand::Save(path)),
        ConsoleCommand::Quit => Some(DirectorCommand::Stop),
        ConsoleCommand::Help | ConsoleCommand::Nothing => None,
    }
}
