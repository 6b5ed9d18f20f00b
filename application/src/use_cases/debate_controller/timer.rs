//! Single-slot delayed trigger.
//!
//! At most one trigger is outstanding. Scheduling replaces the previous one
//! and cancelling aborts it. Each trigger carries a generation number so a
//! trigger that fired just before being superseded is recognised as stale.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Posted to the controller queue when a scheduled delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub generation: u64,
}

pub(crate) struct NextTurnTimer<E> {
    tx: mpsc::UnboundedSender<E>,
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

impl<E> NextTurnTimer<E>
where
    E: From<Trigger> + Send + 'static,
{
    pub(crate) fn new(tx: mpsc::UnboundedSender<E>) -> Self {
        Self {
            tx,
            pending: None,
            generation: 0,
        }
    }

    /// Replace any pending trigger with one firing after `delay`.
    pub(crate) fn schedule(&mut self, delay: Duration) -> u64 {
        self.cancel();
        self.generation += 1;
        let trigger = Trigger {
            generation: self.generation,
        };
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(E::from(trigger));
        }));
        self.generation
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accept a fired trigger if it is the current one, clearing the slot.
    pub(crate) fn accept(&mut self, trigger: Trigger) -> bool {
        if self.pending.is_none() || trigger.generation != self.generation {
            return false;
        }
        self.pending = None;
        true
    }
}

impl<E> Drop for NextTurnTimer<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
