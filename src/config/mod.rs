mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{ApiConfig, Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::scoring::validate_scoring;

/// Environment variable overriding `api.base_url`
pub const ENV_BASE_URL_VAR: &str = "PATIENT_RISK_BASE_URL";

/// Get the config directory path (~/.config/patient-risk/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("patient-risk"))
}

/// Get the default config file path (~/.config/patient-risk/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/patient-risk/config.yaml)
///
/// A missing file yields the defaults. Environment overrides are applied
/// after the file is read.
///
/// # Errors
///
/// Returns an error if:
/// - The config file exists but cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    let mut config = if config_path.exists() {
        let config_content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read config file at {}", config_path.display())
        })?;
        parse_config(&config_content).with_context(|| {
            format!("Failed to parse config: invalid YAML in {}", config_path.display())
        })?
    } else {
        debug!(path = %config_path.display(), "No config file, using defaults");
        Config::default()
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

pub fn parse_config(yaml: &str) -> Result<Config> {
    let config: Config = serde_saphyr::from_str(yaml)?;
    Ok(config)
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL_VAR) {
        let url = url.trim();
        if !url.is_empty() {
            config.api.base_url = url.to_string();
        }
    }
}

/// Parse the configured request timeout.
pub fn request_timeout(api: &ApiConfig) -> Result<Duration> {
    humantime::parse_duration(api.timeout.trim())
        .with_context(|| format!("api.timeout: invalid duration '{}'", api.timeout))
}

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(format!(
            "api.base_url: must start with http:// or https:// (got '{}')",
            config.api.base_url
        ));
    }

    match humantime::parse_duration(config.api.timeout.trim()) {
        Ok(d) if d.is_zero() => errors.push("api.timeout: must be greater than zero".to_string()),
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "api.timeout: invalid format '{}' - {}",
            config.api.timeout, e
        )),
    }

    if let Some(ref scoring) = config.scoring {
        if let Err(scoring_errors) = validate_scoring(scoring) {
            errors.extend(scoring_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
