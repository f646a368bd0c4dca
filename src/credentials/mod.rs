pub mod prompt;

use std::fmt;
use std::io::IsTerminal;
use thiserror::Error;

use crate::config::Config;

/// Environment variable name for providing the patient API key
pub const ENV_API_KEY_VAR: &str = "PATIENT_RISK_API_KEY";

pub use prompt::prompt_for_api_key;

/// Where the API key in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    ConfigFile,
    Prompt,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Environment => write!(f, "{}", ENV_API_KEY_VAR),
            KeySource::ConfigFile => write!(f, "config file"),
            KeySource::Prompt => write!(f, "prompt"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error(
        "No API key found. Set {} or add api.api_key to the config file",
        ENV_API_KEY_VAR
    )]
    NotFound,

    #[error("Failed to read API key: {0}")]
    PromptFailed(String),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Look up the API key without prompting: environment first, then config.
pub fn lookup_api_key<F>(config: &Config, env: F) -> Option<(String, KeySource)>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_empty(env(ENV_API_KEY_VAR)) {
        return Some((key, KeySource::Environment));
    }
    non_empty(config.api.api_key.clone()).map(|key| (key, KeySource::ConfigFile))
}

/// Resolve the API key, prompting when stdin is a terminal.
pub fn resolve_api_key(config: &Config) -> Result<(String, KeySource), CredentialError> {
    if let Some(found) = lookup_api_key(config, |name| std::env::var(name).ok()) {
        return Ok(found);
    }

    if !std::io::stdin().is_terminal() {
        return Err(CredentialError::NotFound);
    }

    let key = prompt_for_api_key().map_err(|e| CredentialError::PromptFailed(format!("{:#}", e)))?;
    Ok((key, KeySource::Prompt))
}
