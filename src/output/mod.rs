pub mod formatter;
pub mod summary;

pub use formatter::{
    format_assessment_table, format_flags, format_json, format_patient_detail, format_risk_score,
    format_tsv, should_use_colors, ScoredPatient,
};
pub use summary::AssessmentSummary;
