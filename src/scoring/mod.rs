pub mod config;
pub mod engine;
pub mod error;
pub mod factors;
pub mod validation;

pub use config::*;
pub use engine::{
    assess_value, check_risk_score, check_risk_score_with, RiskAssessment, RiskBreakdown,
};
pub use error::{ScoringError, ValidationError};
pub use factors::{BloodPressure, BloodPressureTier};
pub use validation::{validate_number, validate_scoring};
