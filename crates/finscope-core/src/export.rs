//! # Export Module
//!
//! Builds the downloadable assessment export from the ledger.
//!
//! The document has two parts: a `summary` describing the selection, and the
//! selected `assessments`, newest first, each carrying its feedback.

use crate::ledger::{AssessmentLedger, Review, SubmissionRecord};
use crate::submission::QuestionResponse;
use crate::system::Stage;
use crate::{FinscopeError, RespondentId, SubmissionId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// DATE RANGE
// =============================================================================

/// Inclusive range of whole UTC days. Missing bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Range with no bounds.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse optional `YYYY-MM-DD` bounds. Blank strings count as absent.
    ///
    /// # Errors
    /// `InvalidDateRange` on a malformed date or when start is after end.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, FinscopeError> {
        let range = Self {
            start: parse_bound("start_date", start)?,
            end: parse_bound("end_date", end)?,
        };

        if let (Some(start), Some(end)) = (range.start, range.end) {
            if start > end {
                return Err(FinscopeError::InvalidDateRange(format!(
                    "start {} is after end {}",
                    start, end
                )));
            }
        }
        Ok(range)
    }

    /// Whether a timestamp falls on a day inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.start.is_none_or(|start| day >= start) && self.end.is_none_or(|end| day <= end)
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, FinscopeError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FinscopeError::InvalidDateRange(format!("{} '{}' is not YYYY-MM-DD", name, raw))),
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Human-readable bounds as shown in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRange {
    pub start: String,
    pub end: String,
}

impl From<&DateRange> for SummaryRange {
    fn from(range: &DateRange) -> Self {
        Self {
            start: range
                .start
                .map_or_else(|| "All time".to_string(), |d| d.format(DATE_FORMAT).to_string()),
            end: range
                .end
                .map_or_else(|| "Present".to_string(), |d| d.format(DATE_FORMAT).to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub total_assessments: usize,
    pub date_range: SummaryRange,
    pub generated_at: DateTime<Utc>,
}

/// One assessment flattened for export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedAssessment {
    pub id: SubmissionId,
    pub respondent_id: RespondentId,
    pub full_name: String,
    pub company_name: String,
    pub designation: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub submitted_at: DateTime<Utc>,
    pub stage: Stage,
    pub stage_title: &'static str,
    pub stage_subtitle: &'static str,
    pub questions_with_responses: Vec<QuestionResponse>,
    pub identified_problems: Vec<String>,
    pub problems: Vec<String>,
    pub solutions: Vec<String>,
    pub feedback: Vec<Review>,
}

impl ExportedAssessment {
    fn from_record(record: &SubmissionRecord, feedback: Vec<Review>) -> Self {
        let submission = &record.submission;
        let details = &submission.personal_details;
        Self {
            id: record.id,
            respondent_id: record.respondent_id,
            full_name: details.full_name.clone(),
            company_name: details.company_name.clone(),
            designation: details.designation.clone(),
            phone_number: details.phone_number.clone(),
            email: submission.email.clone(),
            submitted_at: submission.submitted_at,
            stage: submission.stage,
            stage_title: submission.stage_title,
            stage_subtitle: submission.stage_subtitle,
            questions_with_responses: submission.questions_with_responses.clone(),
            identified_problems: submission.identified_problems.clone(),
            problems: submission.problems.clone(),
            solutions: submission.solutions.clone(),
            feedback,
        }
    }
}

/// The full export document.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub summary: ExportSummary,
    pub assessments: Vec<ExportedAssessment>,
}

/// Select submissions in range and assemble the export document.
#[must_use]
pub fn build_export(
    ledger: &AssessmentLedger,
    range: &DateRange,
    generated_at: DateTime<Utc>,
) -> ExportDocument {
    let assessments: Vec<_> = ledger
        .in_range(range)
        .into_iter()
        .map(|record| {
            let feedback = ledger
                .reviews_for(record.respondent_id)
                .into_iter()
                .cloned()
                .collect();
            ExportedAssessment::from_record(record, feedback)
        })
        .collect();

    ExportDocument {
        summary: ExportSummary {
            total_assessments: assessments.len(),
            date_range: SummaryRange::from(range),
            generated_at,
        },
        assessments,
    }
}

/// Download name for an export generated on `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("assessments-export-{}.json", date.format(DATE_FORMAT))
}

/// Render the document as indented JSON.
pub fn to_json_pretty(document: &ExportDocument) -> Result<String, FinscopeError> {
    serde_json::to_string_pretty(document)
        .map_err(|e| FinscopeError::SerializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
