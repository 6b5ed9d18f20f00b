//! Agent persona configuration

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Model used when neither the agent nor the config names one.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

const DEFAULT_AVATAR_COLOR: &str = "#FFFFFF";

/// A debate participant: persona prompt plus model settings (Entity)
///
/// Fields are validated on construction and on deserialization. The roster
/// is fixed when a debate starts, so there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAgentConfig")]
pub struct AgentConfig {
    id: String,
    name: String,
    system_prompt: String,
    temperature: f64,
    model_name: String,
    avatar_color: String,
}

/// Unvalidated wire form of [`AgentConfig`].
#[derive(Deserialize)]
struct RawAgentConfig {
    id: String,
    name: String,
    system_prompt: String,
    #[serde(default = "default_temperature")]
    temperature: f64,
    #[serde(default = "default_model")]
    model_name: String,
    #[serde(default = "default_avatar_color")]
    avatar_color: String,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_avatar_color() -> String {
    DEFAULT_AVATAR_COLOR.to_string()
}

impl TryFrom<RawAgentConfig> for AgentConfig {
    type Error = ValidationError;

    fn try_from(raw: RawAgentConfig) -> Result<Self, Self::Error> {
        AgentConfig::new(raw.id, raw.name, raw.system_prompt)?
            .with_temperature(raw.temperature)
            .map(|agent| agent.with_model(raw.model_name))?
            .with_avatar_color(raw.avatar_color)
    }
}

impl AgentConfig {
    /// Create an agent with the default model and temperature.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "agent id" });
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "agent name" });
        }

        Ok(Self {
            id,
            name,
            system_prompt: system_prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            model_name: DEFAULT_MODEL.to_string(),
            avatar_color: DEFAULT_AVATAR_COLOR.to_string(),
        })
    }

    /// Set the sampling temperature, rejecting values outside `[0, 2]`.
    pub fn with_temperature(mut self, temperature: f64) -> Result<Self, ValidationError> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ValidationError::Temperature(temperature));
        }
        self.temperature = temperature;
        Ok(self)
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        if !model_name.trim().is_empty() {
            self.model_name = model_name;
        }
        self
    }

    pub fn with_avatar_color(mut self, color: impl Into<String>) -> Result<Self, ValidationError> {
        let color = color.into();
        if color.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "avatar color",
            });
        }
        self.avatar_color = color;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn avatar_color(&self) -> &str {
        &self.avatar_color
    }

    /// Whether this seat is filled by the human operator rather than a model.
    pub fn is_human(&self) -> bool {
        self.id == "user"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let agent = AgentConfig::new("optimist", "Optimist", "Be upbeat.").unwrap();
        assert_eq!(agent.model_name(), DEFAULT_MODEL);
        assert_eq!(agent.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(agent.avatar_color(), "#FFFFFF");
        assert!(!agent.is_human());
    }

    #[test]
    fn test_temperature_bounds() {
        let agent = AgentConfig::new("a", "A", "").unwrap();
        assert!(agent.clone().with_temperature(0.0).is_ok());
        assert!(agent.clone().with_temperature(2.0).is_ok());
        assert_eq!(
            agent.clone().with_temperature(2.1).unwrap_err(),
            ValidationError::Temperature(2.1)
        );
        assert!(agent.with_temperature(-0.5).is_err());
    }

    #[test]
    fn test_empty_id_rejected() {
        assert_eq!(
            AgentConfig::new("  ", "Name", "prompt").unwrap_err(),
            ValidationError::Empty { field: "agent id" }
        );
    }

    #[test]
    fn test_blank_model_keeps_default() {
        let agent = AgentConfig::new("a", "A", "").unwrap().with_model("");
        assert_eq!(agent.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_deserialize_validates_temperature() {
        let json = r#"{"id":"a","name":"A","system_prompt":"p","temperature":3.0}"#;
        assert!(serde_json::from_str::<AgentConfig>(json).is_err());

        let json = r#"{"id":"a","name":"A","system_prompt":"p"}"#;
        let agent: AgentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(agent.temperature(), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_user_seat_is_human() {
        let agent = AgentConfig::new("user", "You", "").unwrap();
        assert!(agent.is_human());
    }
}
