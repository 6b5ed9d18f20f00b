//! Influence weight value object

use super::error::ValidationError;
use serde::{Deserialize, Serialize};

/// How forcefully a director injection is framed to agents (Value Object)
///
/// Always within `[0, 1]`. Ordinary agent messages carry [`InfluenceWeight::NONE`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct InfluenceWeight(f64);

impl InfluenceWeight {
    pub const NONE: InfluenceWeight = InfluenceWeight(0.0);
    pub const MAX: InfluenceWeight = InfluenceWeight(1.0);

    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::InfluenceWeight(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for InfluenceWeight {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InfluenceWeight> for f64 {
    fn from(weight: InfluenceWeight) -> Self {
        weight.0
    }
}

impl std::fmt::Display for InfluenceWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
