//! Completion service port
//!
//! Defines the interface for requesting a reply from an external LLM
//! completion service. Adapters live in the infrastructure layer.

use async_trait::async_trait;
use parley_domain::{AgentConfig, ChatMessage, StreamEvent, TurnPrompt};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during a completion call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl CompletionError {
    /// Configuration problems never go away by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, CompletionError::Configuration(_))
    }
}

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub stream: bool,
}

impl CompletionRequest {
    /// Request for an agent turn, using the agent's model and temperature.
    pub fn for_turn(agent: &AgentConfig, prompt: &TurnPrompt) -> Self {
        Self {
            model: agent.model_name().to_string(),
            messages: prompt.to_messages(),
            temperature: agent.temperature(),
            stream: false,
        }
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Content of the last user message, if any.
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == parley_domain::Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Handle for receiving streaming events from a completion call.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// A handle that yields a single `Completed` event.
    ///
    /// Used by non-streaming adapters and test doubles.
    pub fn from_text(text: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: this cannot fail
        let _ = tx.try_send(StreamEvent::Completed(text.into()));
        Self::new(rx)
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, CompletionError> {
        self.collect_with(|_| {}).await
    }

    /// Consume the stream, calling `on_token` for every fragment.
    ///
    /// The result is the concatenation of all `Delta` fragments. When the
    /// adapter sends no deltas, the `Completed` text is used instead.
    pub async fn collect_with<F>(mut self, mut on_token: F) -> Result<String, CompletionError>
    where
        F: FnMut(&str),
    {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_token(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(CompletionError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed: return what we have
        Ok(full_text)
    }
}

/// External completion service
///
/// Implementations must deliver either a complete text (optionally preceded
/// by incremental fragments) or a typed error. They hold no session state.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<StreamHandle, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_concatenates_deltas_and_reports_tokens() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("Hel".into())).await.unwrap();
        tx.send(StreamEvent::Delta("lo".into())).await.unwrap();
        tx.send(StreamEvent::Completed("ignored".into())).await.unwrap();
        drop(tx);

        let mut tokens = Vec::new();
        let text = StreamHandle::new(rx)
            .collect_with(|t| tokens.push(t.to_string()))
            .await
            .unwrap();

        assert_eq!(text, "Hello");
        assert_eq!(tokens, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn collect_uses_completed_without_deltas() {
        let text = StreamHandle::from_text("whole").collect_text().await.unwrap();
        assert_eq!(text, "whole");
    }

    #[tokio::test]
    async fn collect_surfaces_stream_error() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(StreamEvent::Delta("part".into())).await.unwrap();
        tx.send(StreamEvent::Error("boom".into())).await.unwrap();
        let err = StreamHandle::new(rx).collect_text().await.unwrap_err();
        assert_eq!(err, CompletionError::RequestFailed("boom".into()));
    }

    #[test]
    fn request_for_turn_uses_agent_settings() {
        let agent = AgentConfig::new("a", "A", "sys")
            .unwrap()
            .with_temperature(1.1)
            .unwrap()
            .with_model("openai/gpt-4o");
        let prompt = TurnPrompt {
            system: "sys".into(),
            user: "go".into(),
        };
        let request = CompletionRequest::for_turn(&agent, &prompt).streaming(true);
        assert_eq!(request.model, "openai/gpt-4o");
        assert_eq!(request.temperature, 1.1);
        assert!(request.stream);
        assert_eq!(request.user_prompt(), Some("go"));
    }
}
