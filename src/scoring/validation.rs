use serde_json::Value;

use super::config::{ScoringConfig, MAX_RISK_SCORE};
use super::error::ValidationError;

/// Validate a numeric vital sign.
///
/// An absent value counts as 0 and is therefore invalid. Anything that is
/// not a JSON number (including numeric strings) is `IsNotNumber`.
pub fn validate_number(value: &Value) -> Result<f64, ValidationError> {
    let number = match value {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().ok_or(ValidationError::IsNotNumber)?,
        _ => return Err(ValidationError::IsNotNumber),
    };

    if number < 1.0 {
        return Err(ValidationError::IsInvalid);
    }
    Ok(number)
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(score) = config.high_risk_score {
        if score == 0 || score > MAX_RISK_SCORE {
            errors.push(format!(
                "scoring.high_risk_score: must be between 1 and {} (got {})",
                MAX_RISK_SCORE, score
            ));
        }
    }

    if let Some(threshold) = config.fever_threshold {
        if !threshold.is_finite() || threshold < 1.0 {
            errors.push(format!(
                "scoring.fever_threshold: must be a number >= 1 (got {})",
                threshold
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
