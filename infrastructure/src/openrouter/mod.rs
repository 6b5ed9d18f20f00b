//! OpenRouter completion adapter
//!
//! Implements [`CompletionService`](parley_application::CompletionService)
//! against any OpenAI-compatible `/chat/completions` endpoint, streaming
//! via Server-Sent Events.

mod client;
mod sse;
mod types;

pub use client::{DEFAULT_BASE_URL, OpenRouterClient, OpenRouterConfig};
pub use sse::parse_sse_lines;
