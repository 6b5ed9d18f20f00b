//! Live-mode renderer for controller events

use super::console::ConsoleFormatter;
use indicatif::{ProgressBar, ProgressStyle};
use parley_application::DebateEvent;
use parley_domain::{AgentConfig, DebateStatus, Message, preview};
use std::time::Duration;
use tokio::sync::mpsc;

/// Characters of streamed text shown next to the spinner.
const DRAFT_PREVIEW: usize = 60;

/// Renders [`DebateEvent`]s to the terminal.
///
/// While a turn is in flight a spinner shows the tail of the streamed
/// draft. The draft is never printed; only the appended message is.
pub struct ConsoleRenderer {
    agents: Vec<AgentConfig>,
    spinner: Option<ProgressBar>,
    draft: String,
}

impl ConsoleRenderer {
    pub fn new(agents: Vec<AgentConfig>) -> Self {
        Self {
            agents,
            spinner: None,
            draft: String::new(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Render events until the controller drops its sender.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<DebateEvent>) {
        while let Some(event) = events.recv().await {
            self.render(&event);
        }
        self.clear_spinner();
    }

    pub fn render(&mut self, event: &DebateEvent) {
        match event {
            DebateEvent::StatusChanged { status } => {
                if *status != DebateStatus::Running {
                    self.clear_spinner();
                }
                self.line(ConsoleFormatter::status(*status));
            }
            DebateEvent::TurnStarted {
                agent_name, round, ..
            } => {
                self.clear_spinner();
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(Self::spinner_style());
                spinner.set_prefix(format!("{} (round {})", agent_name, round));
                spinner.set_message("thinking...");
                spinner.enable_steady_tick(Duration::from_millis(100));
                self.spinner = Some(spinner);
            }
            DebateEvent::Token { fragment, .. } => {
                self.draft.push_str(fragment);
                if let Some(spinner) = &self.spinner {
                    spinner.set_message(Self::draft_tail(&self.draft));
                }
            }
            DebateEvent::MessageAppended(message) => {
                if !message.is_injection {
                    self.clear_spinner();
                }
                let text = self.format_message(message);
                self.line(text);
            }
            DebateEvent::TurnFailed { agent_name, error } => {
                self.clear_spinner();
                self.line(ConsoleFormatter::failure(agent_name, error));
                self.line(ConsoleFormatter::notice(
                    "Paused. /resume to retry the same agent.",
                ));
            }
            DebateEvent::RoundCompleted {
                rounds_completed,
                max_rounds,
            } => {
                self.line(format!(
                    "   (round {}/{} complete)",
                    rounds_completed, max_rounds
                ));
            }
            DebateEvent::Completed { rounds_completed } => {
                self.clear_spinner();
                self.line(ConsoleFormatter::notice(&format!(
                    "Debate completed after {} rounds. /save <path> or /quit.",
                    rounds_completed
                )));
            }
            DebateEvent::Saved { path } => {
                self.line(ConsoleFormatter::notice(&format!(
                    "Saved to {}",
                    path.display()
                )));
            }
            DebateEvent::Notice { message } => {
                self.line(ConsoleFormatter::notice(message));
            }
        }
    }

    fn format_message(&self, message: &Message) -> String {
        match self.agents.iter().find(|a| a.id() == message.sender_id) {
            Some(agent) if !message.is_injection => ConsoleFormatter::agent_message(agent, message),
            _ => ConsoleFormatter::message(message),
        }
    }

    /// Last characters of the draft on a single line.
    fn draft_tail(draft: &str) -> String {
        let flat = draft.split_whitespace().collect::<Vec<_>>().join(" ");
        let reversed: String = flat.chars().rev().collect();
        let tail = preview(&reversed, DRAFT_PREVIEW);
        tail.chars().rev().collect()
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.draft.clear();
    }

    fn line(&self, text: impl AsRef<str>) {
        match &self.spinner {
            Some(spinner) => spinner.println(text.as_ref()),
            None => println!("{}", text.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_tail_keeps_the_end() {
        let draft = "word ".repeat(40);
        let tail = ConsoleRenderer::draft_tail(&draft);
        assert!(tail.starts_with("..."));
        assert!(tail.ends_with("word"));
        assert_eq!(tail.chars().count(), DRAFT_PREVIEW + 3);
    }

    #[test]
    fn short_draft_is_flattened() {
        assert_eq!(ConsoleRenderer::draft_tail("a\n\nb  c"), "a b c");
    }

    #[test]
    fn tokens_accumulate_until_the_reply_lands() {
        let agent = AgentConfig::new("pro", "Proponent", "Argue for.").unwrap();
        let mut renderer = ConsoleRenderer::new(vec![agent.clone()]);
        renderer.render(&DebateEvent::TurnStarted {
            agent_id: "pro".into(),
            agent_name: "Proponent".into(),
            round: 1,
        });
        renderer.render(&DebateEvent::Token {
            agent_id: "pro".into(),
            fragment: "Cars ".into(),
        });
        renderer.render(&DebateEvent::Token {
            agent_id: "pro".into(),
            fragment: "are loud.".into(),
        });
        assert_eq!(renderer.draft, "Cars are loud.");
        assert!(renderer.spinner.is_some());

        renderer.render(&DebateEvent::MessageAppended(Message::from_agent(
            &agent,
            "Cars are loud.",
        )));
        assert!(renderer.draft.is_empty());
        assert!(renderer.spinner.is_none());
    }
}
