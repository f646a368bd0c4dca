use std::io::IsTerminal;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::api::types::{display_id, PatientRecord};
use crate::scoring::RiskAssessment;

/// Width of the flags column ("HIGH FEVER")
const FLAGS_WIDTH: usize = 10;

/// A patient with its assessment for display
pub struct ScoredPatient<'a> {
    pub record: &'a PatientRecord,
    pub assessment: &'a RiskAssessment,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a risk score. Appends an asterisk when a field failed validation,
/// since the failed field contributed nothing.
pub fn format_risk_score(score: u32, has_data_issue: bool) -> String {
    if has_data_issue {
        format!("{}*", score)
    } else {
        score.to_string()
    }
}

/// Space-separated flag names, e.g. "HIGH FEVER", or "-" when none are set
pub fn format_flags(assessment: &RiskAssessment) -> String {
    let mut flags = Vec::new();
    if assessment.has_high_risk_score {
        flags.push("HIGH");
    }
    if assessment.has_fever {
        flags.push("FEVER");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(" ")
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format patients as a table with columns: Index, Score, Flags, Id, Issue, Name
/// No headers. Names are truncated to the terminal width; pipes get full names.
pub fn format_assessment_table(rows: &[ScoredPatient], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No patients found.".to_string();
    }

    let term_width = get_terminal_width();
    let id_width = rows
        .iter()
        .map(|row| display_id(&row.assessment.patient_id).chars().count())
        .max()
        .unwrap_or(0);
    let issue_width = rows
        .iter()
        .filter_map(|row| row.assessment.error_code.map(|e| e.code().len()))
        .max()
        .unwrap_or(0);
    let separator = "  ";

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let assessment = row.assessment;
            let index_str = format!("{:>3}.", idx + 1);
            let score_str = format!(
                "{:>2}",
                format_risk_score(assessment.risk_score, assessment.has_data_issue())
            );
            let flags_str = format!("{:<width$}", format_flags(assessment), width = FLAGS_WIDTH);
            let id_str = format!(
                "{:<width$}",
                display_id(&assessment.patient_id),
                width = id_width
            );
            let issue_str = format!(
                "{:<width$}",
                assessment.error_code.map(|e| e.code()).unwrap_or(""),
                width = issue_width
            );

            // index + space + score + flags + id + issue, each column separated
            let fixed_width = index_str.len()
                + 1
                + score_str.len()
                + separator.len() * 4
                + FLAGS_WIDTH
                + id_width
                + issue_width;
            let name = row.record.name().unwrap_or("");
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(name, width - fixed_width),
                Some(_) => truncate(name, 20),
                None => name.to_string(),
            };

            let line = if use_colors {
                let flags_colored = if assessment.has_high_risk_score {
                    flags_str.red().bold().to_string()
                } else if assessment.has_fever {
                    flags_str.yellow().to_string()
                } else {
                    flags_str.dimmed().to_string()
                };
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    flags_colored,
                    separator,
                    id_str.cyan(),
                    separator,
                    issue_str.magenta(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str,
                    score_str,
                    separator,
                    flags_str,
                    separator,
                    id_str,
                    separator,
                    issue_str,
                    separator,
                    name
                )
            };
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single patient with detailed multi-line output (for verbose mode)
pub fn format_patient_detail(row: &ScoredPatient, use_colors: bool) -> String {
    let assessment = row.assessment;
    let breakdown = &assessment.breakdown;
    let id = display_id(&assessment.patient_id);
    let name = row.record.name().unwrap_or("(unnamed)");
    let issue = assessment
        .error_code
        .map(|e| e.code().to_string())
        .unwrap_or_else(|| "none".to_string());
    let score = format_risk_score(assessment.risk_score, assessment.has_data_issue());

    let details = format!(
        "  Blood pressure: {} -> {}\n  Temperature: {} -> {}\n  Age: {} -> {}\n  Score: {}\n  Flags: {}\n  Issue: {}",
        row.record.blood_pressure,
        breakdown.blood_pressure,
        row.record.temperature,
        breakdown.temperature,
        row.record.age,
        breakdown.age,
        score,
        format_flags(assessment),
        issue
    );

    if use_colors {
        format!("{} {}\n{}", id.bold(), name.cyan(), details)
    } else {
        format!("{} {}\n{}", id, name, details)
    }
}

/// Format patients as tab-separated values for scripting
/// Columns: patient_id, riskScore, hasHighRiskScore, hasFever, errorCode (no headers, no colors)
pub fn format_tsv(rows: &[ScoredPatient]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    rows.iter()
        .map(|row| {
            let a = row.assessment;
            format!(
                "{}\t{}\t{}\t{}\t{}",
                display_id(&a.patient_id),
                a.risk_score,
                a.has_high_risk_score,
                a.has_fever,
                a.error_code.map(|e| e.code()).unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format assessments as a pretty-printed JSON array
pub fn format_json(rows: &[ScoredPatient]) -> Result<String> {
    let assessments: Vec<&RiskAssessment> = rows.iter().map(|row| row.assessment).collect();
    serde_json::to_string_pretty(&assessments).context("Failed to serialize assessments")
}
