//! Progress reporting for batch debate runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parley_application::DebateProgressNotifier;
use parley_domain::{AgentConfig, DebateState, Message};
use std::sync::Mutex;
use std::time::Duration;

/// Reports batch progress with a "thinking" spinner per turn
pub struct DebateProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl DebateProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg:.dim} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn finish_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for DebateProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for DebateProgressReporter {
    fn on_debate_start(&self, state: &DebateState) {
        print!("{}", ConsoleFormatter::header(state));
    }

    fn on_round_start(&self, round: u32, max_rounds: u32) {
        println!("{}", ConsoleFormatter::round(round, max_rounds));
    }

    fn on_turn_start(&self, agent: &AgentConfig, _round: u32) {
        if agent.is_human() {
            return;
        }
        self.finish_spinner();
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(agent.name().to_string());
        pb.set_message("is thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn on_turn_complete(&self, agent: &AgentConfig, message: &Message) {
        self.finish_spinner();
        print!("{}", ConsoleFormatter::agent_message(agent, message));
    }

    fn on_turn_failed(&self, agent: &AgentConfig, error: &str) {
        self.finish_spinner();
        println!("{}", ConsoleFormatter::failure(agent.name(), error));
    }

    fn on_injection(&self, message: &Message) {
        print!("{}", ConsoleFormatter::message(message));
    }

    fn on_repetition(&self, repeats: usize) {
        self.finish_spinner();
        println!(
            "\n{} {}",
            "!".yellow(),
            format!(
                "Replies repeated {} times in a row; stopping the debate.",
                repeats
            )
            .yellow()
        );
    }
}

/// Plain line-per-event progress (no spinner)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_debate_start(&self, state: &DebateState) {
        print!("{}", ConsoleFormatter::header(state));
    }

    fn on_round_start(&self, round: u32, max_rounds: u32) {
        println!("{}", ConsoleFormatter::round(round, max_rounds));
    }

    fn on_turn_start(&self, agent: &AgentConfig, round: u32) {
        println!("{} {} (round {})", "->".cyan(), agent.name().bold(), round);
    }

    fn on_turn_complete(&self, agent: &AgentConfig, message: &Message) {
        print!("{}", ConsoleFormatter::agent_message(agent, message));
    }

    fn on_turn_failed(&self, agent: &AgentConfig, error: &str) {
        println!("{}", ConsoleFormatter::failure(agent.name(), error));
    }

    fn on_injection(&self, message: &Message) {
        print!("{}", ConsoleFormatter::message(message));
    }
}
