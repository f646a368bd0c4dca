use serde::{Serialize, Serializer};
use thiserror::Error;

/// Why a single field could not be scored.
///
/// `Display` yields the short code reported in an assessment's `errorCode`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// Absent, empty, or below the minimum valid magnitude.
    #[error("is_invalid")]
    IsInvalid,

    /// Blood pressure text present but the systolic side is not a number.
    #[error("missing_systolic")]
    MissingSystolic,

    /// Blood pressure text present but the diastolic side is not a number.
    #[error("missing_diastolic")]
    MissingDiastolic,

    /// A numeric field held something other than a number.
    #[error("is_not_number")]
    IsNotNumber,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::IsInvalid => "is_invalid",
            ValidationError::MissingSystolic => "missing_systolic",
            ValidationError::MissingDiastolic => "missing_diastolic",
            ValidationError::IsNotNumber => "is_not_number",
        }
    }
}

/// Fatal scoring error. Per-field problems never surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Please provide a valid data object")]
    MissingPatient,
}

/// Serialize an optional validation error as its code, or `""` when absent.
pub(crate) fn serialize_error_code<S>(
    error: &Option<ValidationError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(error.map(|e| e.code()).unwrap_or(""))
}
