//! Domain error types

use thiserror::Error;

/// A field value outside its allowed range.
///
/// Values are rejected at construction time and never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("temperature {0} is outside [0, 2]")]
    Temperature(f64),

    #[error("influence weight {0} is outside [0, 1]")]
    InfluenceWeight(f64),

    #[error("max_rounds must be greater than 0")]
    MaxRounds,

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("duplicate agent id: {0}")]
    DuplicateAgent(String),

    #[error("turn index {index} is out of range for {agents} agents")]
    TurnIndex { index: usize, agents: usize },

    #[error("status {status} is inconsistent with {rounds} of {max} rounds completed")]
    StatusMismatch {
        status: String,
        rounds: u32,
        max: u32,
    },
}

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Debate already completed")]
    SessionCompleted,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::Temperature(2.5);
        assert_eq!(error.to_string(), "temperature 2.5 is outside [0, 2]");
    }

    #[test]
    fn test_serde_error_maps_to_serialization() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let domain: DomainError = err.into();
        assert!(matches!(domain, DomainError::Serialization(_)));
    }
}
