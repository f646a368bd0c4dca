use anyhow::{Context, Result};

/// Prompts the user for the patient API key (input hidden)
pub fn prompt_for_api_key() -> Result<String> {
    eprintln!("Patient API key required.");
    eprintln!("Set {} to skip this prompt.", super::ENV_API_KEY_VAR);
    eprintln!();

    let key = rpassword::prompt_password("Enter API key: ")
        .context("Failed to read API key from terminal")?;

    let key = key.trim();

    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Ok(key.to_string())
}
