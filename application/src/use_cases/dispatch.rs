//! Completion dispatcher.
//!
//! [`CompletionDispatcher`] is the only way turns reach the
//! [`CompletionService`]. It holds a one-permit semaphore, so at most one
//! completion is in flight per session no matter which run mode drives it.
//!
//! Two call styles:
//!
//! - [`dispatch_with_retry`](CompletionDispatcher::dispatch_with_retry) awaits
//!   the reply with backoff (batch runner).
//! - [`spawn`](CompletionDispatcher::spawn) runs one attempt on a background
//!   task and posts [`DispatchEvent`]s to the controller's queue
//!   (interactive controller).
//!
//! Replies are sanitized here. Workers never see session state.

use crate::config::RetryPolicy;
use crate::ports::completion::{CompletionError, CompletionRequest, CompletionService};
use crate::use_cases::retry::retry_with_backoff;
use parley_domain::sanitize_reply;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, warn};

/// Callback receiving advisory streaming fragments.
pub type TokenSink = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("A turn is already in flight")]
    Busy,

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Identifies one dispatched turn; results carrying a stale ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnTicket(u64);

impl TurnTicket {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for TurnTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Message from a spawned dispatch back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    Token {
        ticket: TurnTicket,
        fragment: String,
    },
    Completed {
        ticket: TurnTicket,
        content: String,
    },
    Failed {
        ticket: TurnTicket,
        error: DispatchError,
    },
}

impl DispatchEvent {
    pub fn ticket(&self) -> TurnTicket {
        match self {
            DispatchEvent::Token { ticket, .. }
            | DispatchEvent::Completed { ticket, .. }
            | DispatchEvent::Failed { ticket, .. } => *ticket,
        }
    }
}

pub struct CompletionDispatcher {
    service: Arc<dyn CompletionService>,
    permit: Arc<Semaphore>,
}

impl CompletionDispatcher {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    /// Whether a completion is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.permit.available_permits() == 0
    }

    /// Await a reply, retrying per `policy`.
    ///
    /// Configuration errors are not retried.
    pub async fn dispatch_with_retry(
        &self,
        request: CompletionRequest,
        policy: &RetryPolicy,
        on_token: Option<TokenSink>,
    ) -> Result<String, DispatchError> {
        let _permit = self
            .permit
            .clone()
            .try_acquire_owned()
            .map_err(|_| DispatchError::Busy)?;

        let raw = retry_with_backoff(
            policy,
            |e: &CompletionError| !e.is_configuration(),
            |attempt| {
                let service = Arc::clone(&self.service);
                let request = request.clone();
                let sink = on_token.clone();
                async move {
                    debug!(attempt, model = %request.model, "Requesting completion");
                    let handle = service.complete(request).await?;
                    handle
                        .collect_with(|chunk| {
                            if let Some(sink) = &sink {
                                sink(chunk);
                            }
                        })
                        .await
                }
            },
        )
        .await?;

        finish(&raw)
    }

    /// Run a single attempt on a background task.
    ///
    /// Fails with [`DispatchError::Busy`] when another turn holds the permit.
    /// Otherwise exactly one terminal event (`Completed` or `Failed`) is
    /// posted to `tx`, after the permit has been released.
    pub fn spawn<E>(
        &self,
        ticket: TurnTicket,
        request: CompletionRequest,
        tx: mpsc::UnboundedSender<E>,
    ) -> Result<(), DispatchError>
    where
        E: From<DispatchEvent> + Send + 'static,
    {
        let permit = self
            .permit
            .clone()
            .try_acquire_owned()
            .map_err(|_| DispatchError::Busy)?;
        let service = Arc::clone(&self.service);

        tokio::spawn(async move {
            debug!(%ticket, model = %request.model, "Dispatching turn");
            let token_tx = tx.clone();
            let result = match service.complete(request).await {
                Ok(handle) => {
                    handle
                        .collect_with(|chunk| {
                            let _ = token_tx.send(E::from(DispatchEvent::Token {
                                ticket,
                                fragment: chunk.to_string(),
                            }));
                        })
                        .await
                }
                Err(e) => Err(e),
            };

            let event = match result.map_err(DispatchError::from).and_then(|raw| finish(&raw)) {
                Ok(content) => DispatchEvent::Completed { ticket, content },
                Err(error) => {
                    warn!(%ticket, error = %error, "Turn dispatch failed");
                    DispatchEvent::Failed { ticket, error }
                }
            };

            drop(permit);
            if tx.send(E::from(event)).is_err() {
                debug!(%ticket, "Controller gone; dropping dispatch result");
            }
        });

        Ok(())
    }
}

/// Sanitize a raw reply; an empty result counts as an invalid response.
fn finish(raw: &str) -> Result<String, DispatchError> {
    let content = sanitize_reply(raw);
    if content.is_empty() {
        return Err(CompletionError::InvalidResponse("empty reply".to_string()).into());
    }
    Ok(content)
}
