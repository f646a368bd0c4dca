use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

pub const DEFAULT_BASE_URL: &str = "https://assessment.ksensetech.com/api";
pub const DEFAULT_TIMEOUT: &str = "5s";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

/// Patient API connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in humantime format, e.g. "5s" or "1500ms"
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Sent as the `x-api-key` header. Prefer the environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> String {
    DEFAULT_TIMEOUT.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            api_key: None,
        }
    }
}
