//! Between-turns director prompt for batch runs.

use super::commands::parse_batch_line;
use crate::output::console::ConsoleFormatter;
use async_trait::async_trait;
use colored::Colorize;
use parley_application::{DirectorDecision, DirectorInput};
use parley_domain::AgentConfig;
use std::io::{self, Write};
use tracing::warn;

/// Asks the operator on stdin after every turn.
///
/// End of input counts as Enter, so piping a file through a batch run
/// never stalls it.
pub struct StdinDirector;

impl StdinDirector {
    pub fn new() -> Self {
        Self
    }

    fn read_line(prompt: &str) -> Option<String> {
        print!("{} ", prompt);
        if let Err(e) = io::stdout().flush() {
            warn!("Failed to flush stdout: {}", e);
        }
        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input.trim().to_string()),
            Err(e) => {
                warn!("Failed to read input: {}", e);
                None
            }
        }
    }
}

impl Default for StdinDirector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectorInput for StdinDirector {
    async fn after_turn(&self) -> DirectorDecision {
        println!(
            "{}",
            "Enter to continue, 'u: text' (or 'u0.8: text') to inject, 'q' to quit".dimmed()
        );
        loop {
            let Some(line) = Self::read_line(&"director>".magenta().bold().to_string()) else {
                return DirectorDecision::Continue;
            };
            match parse_batch_line(&line) {
                Ok(decision) => return decision,
                Err(message) => println!("{}", ConsoleFormatter::notice(&message)),
            }
        }
    }

    async fn human_turn(&self, agent: &AgentConfig) -> Option<String> {
        let prompt = format!("{}>", agent.name()).green().bold().to_string();
        Self::read_line(&prompt).filter(|line| !line.is_empty())
    }
}
