//! OpenRouter (OpenAI-compatible) completion client.

use super::sse::parse_sse_lines;
use super::types::{ChatChunk, ChatRequest, ChatResponse, ErrorEnvelope};
use async_trait::async_trait;
use futures::StreamExt;
use parley_application::{CompletionError, CompletionRequest, CompletionService, StreamHandle};
use parley_domain::StreamEvent;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Connection settings for [`OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    /// `None` or empty fails every call with a configuration error.
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` for provider attribution.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            max_tokens: Some(512),
            timeout: Duration::from_secs(120),
            referer: "https://github.com/parley-debate/parley".to_string(),
            title: "Parley".to_string(),
        }
    }
}

/// Stateless HTTP adapter for the [`CompletionService`] port.
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Result<&str, CompletionError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CompletionError::Configuration("API key is not set".to_string()))
    }
}

#[async_trait]
impl CompletionService for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<StreamHandle, CompletionError> {
        let api_key = self.api_key()?;
        let body = ChatRequest::new(&request, self.config.max_tokens);
        debug!(model = %request.model, stream = request.stream, "POST {}", self.endpoint());

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }

        if !request.stream {
            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;
            if let Some(error) = parsed.error {
                return Err(CompletionError::RequestFailed(error.message));
            }
            let text = parsed.into_text().ok_or_else(|| {
                CompletionError::InvalidResponse("response has no message content".to_string())
            })?;
            return Ok(StreamHandle::from_text(text));
        }

        let (tx, rx) = mpsc::channel(64);
        let mut lines = Box::pin(parse_sse_lines(Box::pin(response.bytes_stream())));

        tokio::spawn(async move {
            let mut full_text = String::new();
            while let Some(item) = lines.next().await {
                let data = match item {
                    Ok(data) => data,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                let chunk: ChatChunk = match serde_json::from_str(&data) {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable stream chunk");
                        continue;
                    }
                };
                if let Some(error) = chunk.error {
                    let _ = tx.send(StreamEvent::Error(error.message)).await;
                    return;
                }
                if let Some(delta) = chunk.into_delta() {
                    full_text.push_str(&delta);
                    if tx.send(StreamEvent::Delta(delta)).await.is_err() {
                        // Receiver dropped; nobody wants the rest
                        return;
                    }
                }
            }
            let _ = tx.send(StreamEvent::Completed(full_text)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

fn map_transport_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout
    } else if e.is_connect() {
        CompletionError::Connection(e.to_string())
    } else {
        CompletionError::RequestFailed(e.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> CompletionError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = format!("HTTP {}: {}", status.as_u16(), detail);
    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Configuration(message),
        _ => CompletionError::RequestFailed(message),
    }
}
