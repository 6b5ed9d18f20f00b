//! Debate settings: the typed knobs both run modes read.

use super::pacing::{Pacing, RetryPolicy, SettingsError};
use parley_domain::RepetitionRule;
use std::time::Duration;

/// Run parameters for the interactive controller and the batch runner.
///
/// Built by the infrastructure config loader from `FileConfig` plus CLI
/// overrides. Fields are public; the invariants live in [`Pacing`] and
/// [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct DebateSettings {
    /// Messages shown to the agent in interactive mode.
    pub history_window: usize,
    /// Messages shown to the agent in batch mode.
    pub batch_history_window: usize,
    pub pacing: Pacing,
    pub retry: RetryPolicy,
    /// Batch-only stop rule.
    pub repetition: RepetitionRule,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            history_window: 15,
            batch_history_window: 12,
            pacing: Pacing::default(),
            retry: RetryPolicy::default(),
            repetition: RepetitionRule::default(),
        }
    }
}

impl DebateSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.history_window == 0 || self.batch_history_window == 0 {
            return Err(SettingsError::EmptyWindow);
        }
        Ok(())
    }

    // ==================== Builder Methods ====================

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_repetition(mut self, repetition: RepetitionRule) -> Self {
        self.repetition = repetition;
        self
    }

    /// Override the turn delay, shrinking the settle delay if needed.
    pub fn with_turn_delay(mut self, turn_delay: Duration) -> Self {
        let settle = if turn_delay.is_zero() {
            Duration::ZERO
        } else {
            self.pacing.settle_delay().min(turn_delay / 2)
        };
        // settle < turn holds by construction
        if let Ok(pacing) = Pacing::new(turn_delay, settle) {
            self.pacing = pacing;
        }
        self
    }
}
