use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::schema::{ApiConfig, Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use super::get_config_path;
use crate::scoring::{ScoringConfig, DEFAULT_FEVER_THRESHOLD, DEFAULT_HIGH_RISK_SCORE, MAX_RISK_SCORE};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn check_base_url(s: &str) -> Result<(), String> {
    if s.starts_with("http://") || s.starts_with("https://") {
        Ok(())
    } else {
        Err("must start with http:// or https://".to_string())
    }
}

fn check_timeout(s: &str) -> Result<(), String> {
    match humantime::parse_duration(s) {
        Ok(d) if d.is_zero() => Err("must be greater than zero".to_string()),
        Ok(_) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

fn check_high_risk_score(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(v) if (1..=MAX_RISK_SCORE).contains(&v) => Ok(v),
        _ => Err(format!("must be a whole number between 1 and {}", MAX_RISK_SCORE)),
    }
}

fn check_fever_threshold(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 1.0 => Ok(v),
        _ => Err("must be a number >= 1".to_string()),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Patient Risk Configuration");
    println!("==========================");
    println!();

    // 1. API connection
    let base_url = loop {
        let input = prompt_with_default("Patient API base URL", DEFAULT_BASE_URL)?;
        match check_base_url(&input) {
            Ok(()) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let timeout = loop {
        let input = prompt_with_default("Request timeout", DEFAULT_TIMEOUT)?;
        match check_timeout(&input) {
            Ok(()) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    println!("The API key is read from PATIENT_RISK_API_KEY when set, otherwise you are prompted for it.");
    let store_key = prompt_yes_no("Store an API key in the config file instead?", false)?;
    let api_key = if store_key {
        let key = rpassword::prompt_password("API key: ").context("Failed to read API key")?;
        let key = key.trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    } else {
        None
    };

    // 2. Scoring thresholds
    println!();
    let configure_scoring = prompt_yes_no("Configure scoring thresholds? (n accepts defaults)", false)?;
    let scoring = if configure_scoring {
        let high_risk_score = loop {
            let input = prompt_with_default(
                "Total score flagged as high risk",
                &DEFAULT_HIGH_RISK_SCORE.to_string(),
            )?;
            match check_high_risk_score(&input) {
                Ok(v) => break v,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };
        let fever_threshold = loop {
            let input = prompt_with_default(
                "Fever threshold (F)",
                &DEFAULT_FEVER_THRESHOLD.to_string(),
            )?;
            match check_fever_threshold(&input) {
                Ok(v) => break v,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };
        Some(ScoringConfig {
            high_risk_score: Some(high_risk_score),
            fever_threshold: Some(fever_threshold),
        })
    } else {
        None
    };

    // 3. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        api: ApiConfig {
            base_url,
            timeout,
            api_key,
        },
        scoring,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `patient-risk fetch` to score the current patient list.");

    Ok(())
}
