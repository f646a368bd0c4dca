use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::types::{Pagination, PatientPage, PatientRecord};
use crate::config::Config;
use crate::scoring::{check_risk_score_with, RiskAssessment, ScoringConfig, ScoringError};

/// A record that could not be scored at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position in the input (0-based)
    pub index: usize,
    pub error: ScoringError,
}

/// Result of scoring a page or file of records.
#[derive(Debug, Clone, Default)]
pub struct ScoredBatch {
    /// Scored records, in input order
    pub scored: Vec<(PatientRecord, RiskAssessment)>,
    pub rejected: Vec<RejectedRecord>,
    pub pagination: Option<Pagination>,
    pub total_records: Option<u64>,
}

impl ScoredBatch {
    pub fn assessments(&self) -> impl Iterator<Item = &RiskAssessment> {
        self.scored.iter().map(|(_, assessment)| assessment)
    }
}

/// Score every record. A `null` record is rejected on its own and never
/// stops the rest of the batch.
pub fn score_records(records: &[Value], scoring: &ScoringConfig) -> ScoredBatch {
    let mut batch = ScoredBatch::default();

    for (index, value) in records.iter().enumerate() {
        let outcome = PatientRecord::from_value(value)
            .ok_or(ScoringError::MissingPatient)
            .and_then(|record| {
                let assessment = check_risk_score_with(Some(&record), scoring)?;
                Ok((record, assessment))
            });

        match outcome {
            Ok(scored) => batch.scored.push(scored),
            Err(error) => {
                warn!(index, %error, "Skipping patient record");
                batch.rejected.push(RejectedRecord { index, error });
            }
        }
    }

    batch
}

/// Score a page that was already fetched or read from disk.
pub fn score_page(page: PatientPage, scoring: &ScoringConfig) -> ScoredBatch {
    let mut batch = score_records(&page.records, scoring);
    batch.pagination = page.pagination;
    batch.total_records = page.total_records;
    batch
}

/// Fetch one page of patients from the configured API and score it.
pub async fn fetch_and_score(
    client: &reqwest::Client,
    config: &Config,
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<ScoredBatch> {
    let patient_page =
        crate::api::fetch_patients(client, &config.api.base_url, page, limit).await?;
    info!(records = patient_page.records.len(), "Received patient records");

    let scoring = config.scoring.clone().unwrap_or_default();
    Ok(score_page(patient_page, &scoring))
}

/// Sort by risk score descending. Ties keep their input order.
pub fn sort_by_risk(scored: &mut [(PatientRecord, RiskAssessment)]) {
    scored.sort_by(|a, b| b.1.risk_score.cmp(&a.1.risk_score));
}
