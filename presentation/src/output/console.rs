//! Console formatting for debate transcripts

use colored::{ColoredString, Colorize};
use parley_domain::{AgentConfig, DebateState, DebateStatus, Message, Role};

/// Formats debate state and messages for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner shown before the first turn.
    pub fn header(state: &DebateState) -> String {
        let mut output = String::new();
        output.push_str(&Self::rule());
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), state.topic));

        let names: Vec<String> = state
            .agents
            .iter()
            .map(|a| Self::agent_name(a).to_string())
            .collect();
        output.push_str(&format!("{} {}\n", "Agents:".cyan().bold(), names.join(", ")));
        output.push_str(&format!(
            "{} {}\n",
            "Rounds:".cyan().bold(),
            state.max_rounds
        ));
        if !state.history.is_empty() {
            output.push_str(&format!(
                "{} {} messages, round {}\n",
                "Resumed:".yellow().bold(),
                state.history.len(),
                state.current_round()
            ));
        }
        output.push_str(&Self::rule());
        output
    }

    /// One transcript entry.
    pub fn message(message: &Message) -> String {
        let label = if message.is_injection {
            format!(
                "[{} | {}]",
                message.sender_name, message.influence_weight
            )
            .magenta()
            .bold()
        } else if message.role == Role::System {
            format!("[{}]", message.sender_name).dimmed()
        } else {
            format!("[{}]", message.sender_name).yellow().bold()
        };
        format!("\n{}\n{}\n", label, message.content)
    }

    /// Like [`message`](Self::message), with the agent's own color.
    pub fn agent_message(agent: &AgentConfig, message: &Message) -> String {
        format!(
            "\n{}\n{}\n",
            format!("[{}]", agent.name()).color_for(agent).bold(),
            message.content
        )
    }

    pub fn round(round: u32, max_rounds: u32) -> String {
        format!("\n{}\n", format!("── Round {}/{} ──", round, max_rounds).cyan().bold())
    }

    pub fn status(status: DebateStatus) -> String {
        let text = format!("Status: {}", status);
        match status {
            DebateStatus::Running => text.green().to_string(),
            DebateStatus::Paused => text.yellow().to_string(),
            DebateStatus::Completed => text.cyan().bold().to_string(),
            DebateStatus::Idle => text.dimmed().to_string(),
        }
    }

    pub fn failure(agent_name: &str, error: &str) -> String {
        format!("{} {} failed: {}", "x".red(), agent_name.bold(), error.red())
    }

    pub fn notice(message: &str) -> String {
        format!("{} {}", "!".yellow(), message)
    }

    /// Agent name in its avatar color.
    pub fn agent_name(agent: &AgentConfig) -> ColoredString {
        agent.name().color_for(agent)
    }

    fn rule() -> String {
        format!("{}\n", "═".repeat(60).cyan())
    }
}

trait AvatarColor {
    fn color_for(self, agent: &AgentConfig) -> ColoredString;
}

impl AvatarColor for &str {
    fn color_for(self, agent: &AgentConfig) -> ColoredString {
        match parse_hex(agent.avatar_color()) {
            // White is the default avatar color; leave it to the terminal.
            Some((255, 255, 255)) | None => self.normal(),
            Some((r, g, b)) => self.truecolor(r, g, b),
        }
    }
}

impl AvatarColor for String {
    fn color_for(self, agent: &AgentConfig) -> ColoredString {
        self.as_str().color_for(agent)
    }
}

/// Parse `#RRGGBB`.
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::InfluenceWeight;

    fn state() -> DebateState {
        let agents = vec![
            AgentConfig::new("pro", "Proponent", "Argue for.").unwrap(),
            AgentConfig::new("con", "Opponent", "Argue against.").unwrap(),
        ];
        DebateState::new("Should cities ban cars?", agents, 3).unwrap()
    }

    #[test]
    fn header_lists_topic_and_agents() {
        let header = ConsoleFormatter::header(&state());
        assert!(header.contains("Should cities ban cars?"));
        assert!(header.contains("Proponent"));
        assert!(header.contains("Opponent"));
        assert!(!header.contains("Resumed"));
    }

    #[test]
    fn injection_shows_weight() {
        let weight = InfluenceWeight::new(0.8).unwrap();
        let text = ConsoleFormatter::message(&Message::injection("Talk about buses.", weight));
        assert!(text.contains("Director"));
        assert!(text.contains(&weight.to_string()));
        assert!(text.contains("Talk about buses."));
    }

    #[test]
    fn agent_message_has_content() {
        let agent = AgentConfig::new("pro", "Proponent", "Argue for.").unwrap();
        let message = Message::from_agent(&agent, "Cars are loud.");
        let text = ConsoleFormatter::agent_message(&agent, &message);
        assert!(text.contains("Proponent"));
        assert!(text.contains("Cars are loud."));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#E06C75"), Some((0xE0, 0x6C, 0x75)));
        assert_eq!(parse_hex("E06C75"), None);
        assert_eq!(parse_hex("#E06"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }
}
