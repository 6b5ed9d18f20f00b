//! Role template parsing.
//!
//! A role template is a plain-text persona file. An optional first line
//! `Name: <display name>` sets the display name; everything after it is the
//! system prompt, verbatim apart from surrounding whitespace.
//!
//! ```text
//! Name: The Skeptic
//! You question every claim and ask for evidence.
//! ```

use super::config::{AgentConfig, DEFAULT_TEMPERATURE};
use crate::core::error::ValidationError;
use crate::core::text::capitalize;

/// A parsed role template (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTemplate {
    pub id: String,
    pub name: String,
    pub system_prompt: String,
}

impl RoleTemplate {
    /// Parse template text for the role `id` (usually the file stem).
    ///
    /// Without a `Name:` header the display name is the capitalized id.
    pub fn parse(id: impl Into<String>, text: &str) -> Self {
        let id = id.into();
        let content = text.trim();

        let (name, system_prompt) = match content.split_once('\n') {
            Some((first, rest)) if is_name_header(first) => {
                (header_value(first), rest.trim().to_string())
            }
            None if is_name_header(content) => (header_value(content), String::new()),
            _ => (capitalize(&id), content.to_string()),
        };

        // An empty header value falls back to the id-derived name
        let name = if name.is_empty() { capitalize(&id) } else { name };

        Self {
            id,
            name,
            system_prompt,
        }
    }

    /// Build an agent from this template with the given model.
    pub fn into_agent(self, model_name: &str) -> Result<AgentConfig, ValidationError> {
        AgentConfig::new(self.id, self.name, self.system_prompt)?
            .with_temperature(DEFAULT_TEMPERATURE)
            .map(|agent| agent.with_model(model_name))
    }
}

fn is_name_header(line: &str) -> bool {
    line.trim_start()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("name:"))
}

fn header_value(line: &str) -> String {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}
