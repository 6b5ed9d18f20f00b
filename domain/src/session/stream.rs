//! Streaming events for completion calls.
//!
//! [`StreamEvent`] represents individual events in a streaming completion,
//! letting a progress display show an agent's reply as it is generated.
//! Tokens are advisory: only the final assembled reply becomes state.

/// An event in a streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}
