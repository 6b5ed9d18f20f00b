use super::issue::ConfigIssue;
use crate::roles::RoleError;
use parley_application::SettingsError;
use parley_domain::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error("Agent '{id}': {source}")]
    Agent {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("Could not read system prompt file {path}: {source}")]
    PromptFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}
