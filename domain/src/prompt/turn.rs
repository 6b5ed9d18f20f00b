//! Turn prompt construction.
//!
//! A turn prompt is the agent's fixed persona as the system message plus a
//! user message built from the topic, the windowed transcript and, when a
//! director injection is still unanswered, the shaded instruction.

use super::shader::shade;
use crate::agent::config::AgentConfig;
use crate::context::window::{format_transcript, format_transcript_recent_first, window};
use crate::debate::message::{Message, Role};
use serde::{Deserialize, Serialize};

/// One `{role, content}` entry of a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The two-part prompt for a single agent turn (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPrompt {
    pub system: String,
    pub user: String,
}

impl TurnPrompt {
    /// Prompt for the interactive controller: chronological transcript.
    ///
    /// `pending` is an injection no agent has answered yet. It is shaded even
    /// when replies were appended after it. Without one, a trailing injection
    /// in `history` is used.
    pub fn interactive(
        agent: &AgentConfig,
        topic: &str,
        history: &[Message],
        history_limit: usize,
        pending: Option<&Message>,
    ) -> Self {
        let transcript = format_transcript(window(history, history_limit));

        let mut user = format!(
            "The debate topic is: {}\n\nRecent transcript:\n{}\n\n",
            topic, transcript
        );

        let instruction = match pending.filter(|m| m.is_injection) {
            Some(injection) => Some(shade(&injection.content, injection.influence_weight)),
            None => director_instruction(history),
        };
        if let Some(instruction) = instruction {
            user.push_str(&instruction);
            user.push_str("\n\n");
        }

        user.push_str(&format!(
            "It is now your turn. Respond as {}. \
             Keep it concise (under 200 words). React to the previous speaker.",
            agent.name()
        ));

        Self {
            system: agent.system_prompt().to_string(),
            user,
        }
    }

    /// Prompt for the batch runner: most-recent-first transcript, or an
    /// opener when nothing has been said yet.
    pub fn batch(
        agent: &AgentConfig,
        topic: &str,
        history: &[Message],
        history_limit: usize,
    ) -> Self {
        let recent = window(history, history_limit);

        let user = if recent.is_empty() {
            format!(
                "You are {}. Start the debate on the topic: {}",
                agent.name(),
                topic
            )
        } else {
            let mut body = format!(
                "The debate topic is: {}\n\nThe debate so far (most recent first):\n{}\n\n",
                topic,
                format_transcript_recent_first(recent)
            );
            if let Some(instruction) = director_instruction(history) {
                body.push_str(&instruction);
                body.push_str("\n\n");
            }
            body.push_str(&format!(
                "You are responding *as* {}. Reply in character. \
                 Focus on advancing the discussion: critique the last speaker, add one concrete suggestion, \
                 and (optionally) request clarification if something is ambiguous. Label speculation clearly.",
                agent.name()
            ));
            body
        };

        Self {
            system: agent.system_prompt().to_string(),
            user,
        }
    }

    /// Ordered `[system, user]` messages for the completion request.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.user.clone()),
        ]
    }
}

/// The shaded instruction when the most recent entry is an injection.
fn director_instruction(history: &[Message]) -> Option<String> {
    history
        .last()
        .filter(|m| m.is_injection)
        .map(|m| shade(&m.content, m.influence_weight))
}
