use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::scoring::RiskAssessment;

/// Patient ids grouped by the flag they raised.
///
/// A patient may appear in more than one list. Each list keeps input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub high_risk_patients: Vec<Value>,
    pub fever_patients: Vec<Value>,
    pub data_quality_issues: Vec<Value>,
    pub generated_at: DateTime<Utc>,
}

impl AssessmentSummary {
    pub fn from_assessments<'a, I>(assessments: I) -> Self
    where
        I: IntoIterator<Item = &'a RiskAssessment>,
    {
        let mut summary = AssessmentSummary {
            high_risk_patients: Vec::new(),
            fever_patients: Vec::new(),
            data_quality_issues: Vec::new(),
            generated_at: Utc::now(),
        };

        for assessment in assessments {
            if assessment.has_high_risk_score {
                summary.high_risk_patients.push(assessment.patient_id.clone());
            }
            if assessment.has_fever {
                summary.fever_patients.push(assessment.patient_id.clone());
            }
            if assessment.has_data_issue() {
                summary.data_quality_issues.push(assessment.patient_id.clone());
            }
        }

        summary
    }
}
