//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into application settings
//! and domain agents happens after [`FileConfig::validate`] passes.

mod agents;
mod debate;
mod logging;
mod provider;

pub use agents::FileAgentEntry;
pub use debate::{FileDebateConfig, FilePacingConfig, FileRepetitionConfig, FileRetryConfig};
pub use logging::{FileLoggingConfig, FileRolesConfig};
pub use provider::FileProviderConfig;

use super::error::ConfigError;
use super::issue::ConfigIssue;
use crate::openrouter::OpenRouterConfig;
use crate::roles::RoleLibrary;
use parley_application::{DebateSettings, Pacing, RetryPolicy};
use parley_domain::{AgentConfig, RepetitionRule};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub debate: FileDebateConfig,
    pub pacing: FilePacingConfig,
    pub retry: FileRetryConfig,
    pub repetition: FileRepetitionConfig,
    pub provider: FileProviderConfig,
    pub logging: FileLoggingConfig,
    pub roles: FileRolesConfig,
    pub agents: Vec<FileAgentEntry>,
}

impl FileConfig {
    /// Check every section, returning all problems found.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Debate shape
        if self.debate.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                "debate.max_rounds",
                "must be at least 1",
            ));
        }
        if self.debate.history_window == 0 {
            issues.push(ConfigIssue::error(
                "debate.history_window",
                "must be at least 1",
            ));
        }
        if self.debate.batch_history_window == 0 {
            issues.push(ConfigIssue::error(
                "debate.batch_history_window",
                "must be at least 1",
            ));
        }

        // 2. Pacing and retry
        let pacing = &self.pacing;
        let both_zero = pacing.turn_delay_ms == 0 && pacing.settle_delay_ms == 0;
        if !both_zero && pacing.settle_delay_ms >= pacing.turn_delay_ms {
            issues.push(ConfigIssue::error(
                "pacing.settle_delay_ms",
                format!(
                    "must be shorter than pacing.turn_delay_ms ({} >= {})",
                    pacing.settle_delay_ms, pacing.turn_delay_ms
                ),
            ));
        }
        if self.retry.max_tries == 0 {
            issues.push(ConfigIssue::error("retry.max_tries", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.repetition.threshold) {
            issues.push(ConfigIssue::error(
                "repetition.threshold",
                format!("must be within [0, 1], got {}", self.repetition.threshold),
            ));
        }

        // 3. Provider
        if self.provider.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error("provider.base_url", "cannot be empty"));
        }
        if self.provider.default_model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                "provider.default_model",
                "cannot be empty",
            ));
        }
        if self.provider.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                "provider.timeout_seconds",
                "cannot be 0",
            ));
        }

        // 4. Roster
        self.validate_agents(&mut issues);

        issues
    }

    fn validate_agents(&self, issues: &mut Vec<ConfigIssue>) {
        let mut seen = HashSet::new();
        for (i, entry) in self.agents.iter().enumerate() {
            let field = format!("agents[{}]", i);
            let is_human = entry.id.as_deref() == Some("user");

            if entry.role.is_none() {
                if entry.id.as_deref().is_none_or(|s| s.trim().is_empty()) {
                    issues.push(ConfigIssue::error(
                        format!("{}.id", field),
                        "required when no role is given",
                    ));
                }
                if entry.name.as_deref().is_none_or(|s| s.trim().is_empty()) {
                    issues.push(ConfigIssue::error(
                        format!("{}.name", field),
                        "required when no role is given",
                    ));
                }
                if !is_human && entry.system_prompt.is_none() && entry.system_prompt_file.is_none()
                {
                    issues.push(ConfigIssue::error(
                        format!("{}.system_prompt", field),
                        "give role, system_prompt or system_prompt_file",
                    ));
                }
            }
            if entry.system_prompt.is_some() && entry.system_prompt_file.is_some() {
                issues.push(ConfigIssue::warning(
                    format!("{}.system_prompt_file", field),
                    "ignored because system_prompt is set",
                ));
            }
            if let Some(t) = entry.temperature
                && !(0.0..=2.0).contains(&t)
            {
                issues.push(ConfigIssue::error(
                    format!("{}.temperature", field),
                    format!("must be within [0, 2], got {}", t),
                ));
            }
            if !seen.insert(entry.label().to_string()) {
                issues.push(ConfigIssue::error(
                    format!("{}.id", field),
                    format!("duplicate agent id '{}'", entry.label()),
                ));
            }
        }
    }

    /// Fail on any error-level issue.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let errors: Vec<_> = self
            .validate()
            .into_iter()
            .filter(ConfigIssue::is_error)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Typed run settings.
    pub fn to_settings(&self) -> Result<DebateSettings, ConfigError> {
        let settings = DebateSettings {
            history_window: self.debate.history_window,
            batch_history_window: self.debate.batch_history_window,
            pacing: Pacing::new(
                Duration::from_millis(self.pacing.turn_delay_ms),
                Duration::from_millis(self.pacing.settle_delay_ms),
            )?,
            retry: RetryPolicy::new(
                self.retry.max_tries,
                Duration::from_millis(self.retry.initial_delay_ms),
            )?,
            repetition: RepetitionRule {
                stop_on_repeat: self.repetition.stop_on_repeat,
                threshold: self.repetition.threshold,
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Connection settings, reading the API key from `provider.api_key_env`.
    pub fn provider_config(&self) -> OpenRouterConfig {
        let api_key = std::env::var(&self.provider.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        OpenRouterConfig {
            base_url: self.provider.base_url.clone(),
            api_key,
            max_tokens: self.provider.max_tokens,
            timeout: Duration::from_secs(self.provider.timeout_seconds),
            ..OpenRouterConfig::default()
        }
    }

    /// Build the roster, loading role templates and prompt files as needed.
    pub fn resolve_agents(&self, library: &RoleLibrary) -> Result<Vec<AgentConfig>, ConfigError> {
        self.agents
            .iter()
            .map(|entry| self.resolve_agent(entry, library))
            .collect()
    }

    fn resolve_agent(
        &self,
        entry: &FileAgentEntry,
        library: &RoleLibrary,
    ) -> Result<AgentConfig, ConfigError> {
        let template = match &entry.role {
            Some(role) => Some(library.load(role)?),
            None => None,
        };

        let id = entry
            .id
            .clone()
            .or_else(|| template.as_ref().map(|t| t.id.clone()))
            .unwrap_or_default();
        let name = entry
            .name
            .clone()
            .or_else(|| template.as_ref().map(|t| t.name.clone()))
            .unwrap_or_default();

        let system_prompt = match (&entry.system_prompt, &entry.system_prompt_file) {
            (Some(prompt), _) => prompt.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(|s| s.trim().to_string())
                .map_err(|source| ConfigError::PromptFile {
                    path: path.display().to_string(),
                    source,
                })?,
            (None, None) => template
                .map(|t| t.system_prompt)
                .unwrap_or_default(),
        };

        let agent_error = |source| ConfigError::Agent {
            id: entry.label().to_string(),
            source,
        };
        let model = entry
            .model
            .as_deref()
            .unwrap_or(&self.provider.default_model);

        let mut agent = AgentConfig::new(id, name, system_prompt)
            .map_err(agent_error)?
            .with_model(model);
        if let Some(t) = entry.temperature {
            agent = agent.with_temperature(t).map_err(agent_error)?;
        }
        if let Some(color) = &entry.avatar_color {
            agent = agent.with_avatar_color(color.as_str()).map_err(agent_error)?;
        }
        Ok(agent)
    }
}
