use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::config::ScoringConfig;
use super::error::{serialize_error_code, ScoringError, ValidationError};
use super::factors::{age_points, temperature_points, BloodPressure};
use super::validation::validate_number;
use crate::api::types::PatientRecord;

/// Points contributed by each vital sign. A failed field contributes 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskBreakdown {
    pub temperature: u32,
    pub blood_pressure: u32,
    pub age: u32,
}

impl RiskBreakdown {
    pub fn total(&self) -> u32 {
        self.temperature + self.blood_pressure + self.age
    }
}

/// Outcome of scoring one patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub patient_id: Value,

    #[serde(rename = "riskScore")]
    pub risk_score: u32,

    #[serde(rename = "hasHighRiskScore")]
    pub has_high_risk_score: bool,

    #[serde(rename = "hasFever")]
    pub has_fever: bool,

    /// Last validation failure seen, in evaluation order.
    #[serde(rename = "errorCode", serialize_with = "serialize_error_code")]
    pub error_code: Option<ValidationError>,

    #[serde(skip)]
    pub breakdown: RiskBreakdown,
}

impl RiskAssessment {
    pub fn has_data_issue(&self) -> bool {
        self.error_code.is_some()
    }
}

/// Score a patient with the default thresholds.
///
/// `None` is the only fatal input. Every other problem degrades the affected
/// sub-score to 0 and is reported through `error_code`.
pub fn check_risk_score(patient: Option<&PatientRecord>) -> Result<RiskAssessment, ScoringError> {
    check_risk_score_with(patient, &ScoringConfig::default())
}

pub fn check_risk_score_with(
    patient: Option<&PatientRecord>,
    config: &ScoringConfig,
) -> Result<RiskAssessment, ScoringError> {
    let patient = patient.ok_or(ScoringError::MissingPatient)?;
    Ok(assess(patient, config))
}

/// Score a raw JSON record. `null` is rejected with `MissingPatient`.
pub fn assess_value(value: &Value, config: &ScoringConfig) -> Result<RiskAssessment, ScoringError> {
    let record = PatientRecord::from_value(value);
    check_risk_score_with(record.as_ref(), config)
}

/// Temperature points plus the temperature used for the fever flag.
fn temperature_risk(value: &Value) -> Result<(f64, u32), ValidationError> {
    let temperature = validate_number(value)?;
    Ok((temperature, temperature_points(temperature)))
}

fn blood_pressure_risk(value: &Value) -> Result<u32, ValidationError> {
    match value {
        Value::String(s) => Ok(BloodPressure::parse(s)?.tier().points()),
        _ => Err(ValidationError::IsInvalid),
    }
}

fn age_risk(value: &Value) -> Result<u32, ValidationError> {
    Ok(age_points(validate_number(value)?))
}

fn assess(patient: &PatientRecord, config: &ScoringConfig) -> RiskAssessment {
    let mut error_code = None;
    let mut record_failure = |field: &str, error: ValidationError| {
        debug!(
            patient_id = %patient.patient_id,
            field,
            code = error.code(),
            "Field failed validation"
        );
        // Later failures overwrite earlier ones.
        error_code = Some(error);
    };

    let (temperature, temperature_points) = match temperature_risk(&patient.temperature) {
        Ok(result) => result,
        Err(e) => {
            record_failure("temperature", e);
            (0.0, 0)
        }
    };

    let blood_pressure_points = match blood_pressure_risk(&patient.blood_pressure) {
        Ok(points) => points,
        Err(e) => {
            record_failure("blood_pressure", e);
            0
        }
    };

    let age_points = match age_risk(&patient.age) {
        Ok(points) => points,
        Err(e) => {
            record_failure("age", e);
            0
        }
    };

    let breakdown = RiskBreakdown {
        temperature: temperature_points,
        blood_pressure: blood_pressure_points,
        age: age_points,
    };
    let risk_score = breakdown.total();

    RiskAssessment {
        patient_id: patient.patient_id.clone(),
        risk_score,
        has_high_risk_score: risk_score >= config.high_risk_score(),
        has_fever: temperature >= config.fever_threshold(),
        error_code,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_patient(blood_pressure: Value, temperature: Value, age: Value) -> PatientRecord {
        PatientRecord {
            patient_id: json!("DEMO001"),
            blood_pressure,
            temperature,
            age,
            extra: Default::default(),
        }
    }

    fn score(blood_pressure: Value, temperature: Value, age: Value) -> RiskAssessment {
        let patient = sample_patient(blood_pressure, temperature, age);
        check_risk_score(Some(&patient)).unwrap()
    }

    #[test]
    fn test_null_patient_is_fatal() {
        assert_eq!(check_risk_score(None), Err(ScoringError::MissingPatient));
    }

    #[test]
    fn test_null_value_is_fatal() {
        let result = assess_value(&Value::Null, &ScoringConfig::default());
        assert_eq!(result, Err(ScoringError::MissingPatient));
    }

    #[test]
    fn test_healthy_patient() {
        let result = score(json!("120/80"), json!(98.6), json!(30));
        assert_eq!(result.risk_score, 0);
        assert!(!result.has_high_risk_score);
        assert!(!result.has_fever);
        assert_eq!(result.error_code, None);
        assert_eq!(result.patient_id, json!("DEMO001"));
    }

    #[test]
    fn test_stage2_blood_pressure() {
        let result = score(json!("150/95"), json!(98.6), json!(30));
        assert_eq!(result.breakdown.blood_pressure, 3);
        assert_eq!(result.risk_score, 3);
        assert!(!result.has_high_risk_score);
    }

    #[test]
    fn test_overlong_systolic_scores_stage2() {
        let result = score(json!("99999999999999999999/95"), json!(98.6), json!(30));
        assert_eq!(result.error_code, None);
        assert_eq!(result.breakdown.blood_pressure, 3);
        assert_eq!(result.risk_score, 3);
    }

    #[test]
    fn test_high_risk_at_four() {
        // 3 (bp) + 0 (temp) + 1 (age)
        let result = score(json!("150/95"), json!(98.6), json!(50));
        assert_eq!(result.risk_score, 4);
        assert!(result.has_high_risk_score);
    }

    #[test]
    fn test_maximum_score() {
        let result = score(json!("160/100"), json!(102.5), json!(80));
        assert_eq!(
            result.breakdown,
            RiskBreakdown {
                temperature: 2,
                blood_pressure: 3,
                age: 2
            }
        );
        assert_eq!(result.risk_score, 7);
        assert!(result.has_high_risk_score);
        assert!(result.has_fever);
    }

    #[test]
    fn test_fever_boundary() {
        assert!(score(json!("120/80"), json!(99.6), json!(30)).has_fever);
        assert!(!score(json!("120/80"), json!(99.5), json!(30)).has_fever);
    }

    #[test]
    fn test_fever_flag_uses_raw_temperature_in_tier_gap() {
        let result = score(json!("120/80"), json!(100.95), json!(30));
        assert_eq!(result.breakdown.temperature, 0);
        assert!(result.has_fever);

        let result = score(json!("120/80"), json!(99.55), json!(30));
        assert_eq!(result.breakdown.temperature, 0);
        assert!(!result.has_fever);
    }

    #[test]
    fn test_missing_diastolic() {
        let result = score(json!("150/"), json!(98.6), json!(30));
        assert_eq!(result.error_code, Some(ValidationError::MissingDiastolic));
        assert_eq!(result.breakdown.blood_pressure, 0);
        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn test_blood_pressure_absent_or_wrong_type() {
        for bp in [Value::Null, json!(""), json!(120), json!(["120", "80"])] {
            let result = score(bp, json!(98.6), json!(30));
            assert_eq!(result.error_code, Some(ValidationError::IsInvalid));
            assert_eq!(result.breakdown.blood_pressure, 0);
        }
    }

    #[test]
    fn test_blood_pressure_non_numeric() {
        let result = score(json!("INVALID"), json!(98.6), json!(30));
        assert_eq!(result.error_code, Some(ValidationError::MissingSystolic));
    }

    #[test]
    fn test_invalid_temperature_clears_fever() {
        let result = score(json!("120/80"), json!("INVALID"), json!(30));
        assert_eq!(result.breakdown.temperature, 0);
        assert!(!result.has_fever);
        assert_eq!(result.error_code, Some(ValidationError::IsNotNumber));
    }

    #[test]
    fn test_missing_temperature_is_invalid() {
        let result = score(json!("120/80"), Value::Null, json!(30));
        assert_eq!(result.error_code, Some(ValidationError::IsInvalid));
        assert!(!result.has_fever);
    }

    #[test]
    fn test_age_zero_is_invalid() {
        let result = score(json!("120/80"), json!(98.6), json!(0));
        assert_eq!(result.error_code, Some(ValidationError::IsInvalid));
        assert_eq!(result.breakdown.age, 0);
    }

    #[test]
    fn test_age_text_is_not_number() {
        let result = score(json!("120/80"), json!(98.6), json!("fifty-three"));
        assert_eq!(result.error_code, Some(ValidationError::IsNotNumber));
    }

    #[test]
    fn test_failed_field_does_not_stop_others() {
        // Temperature fails, blood pressure and age still score.
        let result = score(json!("150/95"), json!("TEMP_ERROR"), json!(70));
        assert_eq!(result.breakdown.blood_pressure, 3);
        assert_eq!(result.breakdown.age, 2);
        assert_eq!(result.risk_score, 5);
        assert!(result.has_high_risk_score);
    }

    // Known ambiguity: only the last failure is reported, so earlier
    // failures are masked. Kept as observed rather than collecting all.
    #[test]
    fn test_last_error_wins_age_over_temperature() {
        let result = score(json!("120/80"), json!("INVALID"), json!(0));
        assert_eq!(result.error_code, Some(ValidationError::IsInvalid));
    }

    #[test]
    fn test_last_error_wins_blood_pressure_over_temperature() {
        let result = score(json!("150/"), json!("INVALID"), json!(30));
        assert_eq!(result.error_code, Some(ValidationError::MissingDiastolic));
    }

    #[test]
    fn test_last_error_wins_age_over_blood_pressure() {
        let result = score(json!("/90"), json!(98.6), json!("unknown"));
        assert_eq!(result.error_code, Some(ValidationError::IsNotNumber));
    }

    #[test]
    fn test_mixed_reading_scores_stage2() {
        let result = score(json!("135/70"), json!(98.6), json!(30));
        assert_eq!(result.breakdown.blood_pressure, 3);
    }

    #[test]
    fn test_custom_thresholds() {
        let patient = sample_patient(json!("150/95"), json!(99.0), json!(50));
        let config = ScoringConfig {
            high_risk_score: Some(5),
            fever_threshold: Some(99.0),
        };
        let result = check_risk_score_with(Some(&patient), &config).unwrap();
        assert_eq!(result.risk_score, 4);
        assert!(!result.has_high_risk_score);
        assert!(result.has_fever);
    }

    #[test]
    fn test_assess_value_non_object() {
        let result = assess_value(&json!("oops"), &ScoringConfig::default()).unwrap();
        assert!(result.patient_id.is_null());
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.error_code, Some(ValidationError::IsInvalid));
    }

    #[test]
    fn test_serialized_shape() {
        let result = score(json!("150/"), json!(101.2), json!(70));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({
                "patient_id": "DEMO001",
                "riskScore": 4,
                "hasHighRiskScore": true,
                "hasFever": true,
                "errorCode": "missing_diastolic"
            })
        );
    }

    #[test]
    fn test_serialized_empty_error_code() {
        let result = score(json!("120/80"), json!(98.6), json!(30));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["errorCode"], json!(""));
    }
}
