//! Pacing and retry parameters.
//!
//! [`Pacing`] controls the spacing between turns, [`RetryPolicy`] the
//! backoff schedule for failed completion calls. Both are validated on
//! construction; the use cases trust them afterwards.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("settle delay ({settle:?}) must be shorter than the turn delay ({turn:?})")]
    SettleNotShorter { settle: Duration, turn: Duration },

    #[error("retry max_tries must be at least 1")]
    NoAttempts,

    #[error("history window must be at least 1")]
    EmptyWindow,
}

/// Delays between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    turn_delay: Duration,
    settle_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            turn_delay: Duration::from_millis(1500),
            settle_delay: Duration::from_millis(300),
        }
    }
}

impl Pacing {
    /// `settle_delay` must be strictly shorter than `turn_delay`, except that
    /// both may be zero.
    pub fn new(turn_delay: Duration, settle_delay: Duration) -> Result<Self, SettingsError> {
        let zero = turn_delay.is_zero() && settle_delay.is_zero();
        if !zero && settle_delay >= turn_delay {
            return Err(SettingsError::SettleNotShorter {
                settle: settle_delay,
                turn: turn_delay,
            });
        }
        Ok(Self {
            turn_delay,
            settle_delay,
        })
    }

    /// Wait after a successful turn before the next one.
    pub fn turn_delay(&self) -> Duration {
        self.turn_delay
    }

    /// Wait after a director injection before the next turn.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }
}

/// Exponential backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_tries: u32,
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_tries: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_tries: u32, initial_delay: Duration) -> Result<Self, SettingsError> {
        if max_tries == 0 {
            return Err(SettingsError::NoAttempts);
        }
        Ok(Self {
            max_tries,
            initial_delay,
        })
    }

    /// A single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_tries: 1,
            initial_delay: Duration::ZERO,
        }
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Wait after the `attempt`-th failure (1-based): `initial × 2^(attempt-1)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_delay.saturating_mul(1 << exponent)
    }
}
