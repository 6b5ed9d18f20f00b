//! Snapshot store port
//!
//! Persists and restores a whole [`DebateState`] as one document.

use parley_domain::{DebateState, DomainError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot: {0}")]
    Invalid(#[from] DomainError),
}

/// Storage for debate snapshots.
///
/// `save` must never leave a half-written document behind; `load` must
/// reject documents whose invariants do not hold.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, state: &DebateState, path: &Path) -> Result<(), SnapshotError>;

    fn load(&self, path: &Path) -> Result<DebateState, SnapshotError>;
}
