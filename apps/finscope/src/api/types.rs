//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use finscope_core::{
    AnswerSet, FinscopeError, PersonalDetails, Question, Reaction, RespondentId, ReviewDraft,
    ScoreReport, Stage, StageDescriptor,
};
use finscope_core::export::ExportedAssessment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CATALOG / STAGE JSON
// =============================================================================

/// Option JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionJson {
    pub id: String,
    pub text: String,
    pub weight: i64,
    #[serde(default)]
    pub problem: String,
}

/// Question JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionJson {
    pub id: String,
    pub text: String,
    pub description: String,
    pub multi_select: bool,
    pub options: Vec<OptionJson>,
}

impl From<&Question> for QuestionJson {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.to_string(),
            text: question.text.to_string(),
            description: question.description.to_string(),
            multi_select: question.multi_select,
            options: question
                .options
                .iter()
                .map(|o| OptionJson {
                    id: o.id.to_string(),
                    text: o.text.to_string(),
                    weight: o.weight,
                    problem: o.problem.to_string(),
                })
                .collect(),
        }
    }
}

/// Stage descriptor JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageJson {
    pub stage: i64,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub problems: Vec<String>,
    pub solutions: Vec<String>,
    pub cta_heading: String,
    pub cta_paragraph: String,
    pub services: String,
    /// The stage to grow into; `None` at stage 5.
    pub next_stage: Option<i64>,
}

impl From<&StageDescriptor> for StageJson {
    fn from(descriptor: &StageDescriptor) -> Self {
        Self {
            stage: descriptor.stage.number(),
            title: descriptor.title.to_string(),
            subtitle: descriptor.subtitle.to_string(),
            description: descriptor.description.to_string(),
            problems: descriptor.problems.iter().map(|p| p.to_string()).collect(),
            solutions: descriptor.solutions.iter().map(|s| s.to_string()).collect(),
            cta_heading: descriptor.call_to_action.heading.to_string(),
            cta_paragraph: descriptor.call_to_action.paragraph.to_string(),
            services: descriptor.services.to_string(),
            next_stage: descriptor.stage.next().map(Stage::number),
        }
    }
}

// =============================================================================
// SCORE REQUEST/RESPONSE
// =============================================================================

/// Score request: answers only, nothing is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub answers: AnswerSet,
}

/// Score response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub success: bool,
    pub stage: Option<StageJson>,
    pub rule: Option<String>,
    pub values: Vec<i64>,
    pub skipped: usize,
    pub error: Option<String>,
}

impl ScoreResponse {
    pub fn success(report: &ScoreReport) -> Self {
        Self {
            success: true,
            stage: Some(StageJson::from(report.stage.descriptor())),
            rule: Some(report.resolution.rule().to_string()),
            values: report.values.clone(),
            skipped: report.skipped,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            stage: None,
            rule: None,
            values: vec![],
            skipped: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SUBMISSION REQUEST/RESPONSE
// =============================================================================

/// Finished-quiz submission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub personal_details: PersonalDetails,
    pub answers: AnswerSet,
}

/// Submission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub submission_id: Option<u64>,
    pub respondent_id: Option<u64>,
    pub email: Option<String>,
    pub stage: Option<StageJson>,
    #[serde(default)]
    pub identified_problems: Vec<String>,
    pub error: Option<String>,
}

impl SubmissionResponse {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            submission_id: None,
            respondent_id: None,
            email: None,
            stage: None,
            identified_problems: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// REVIEW REQUEST/RESPONSE
// =============================================================================

/// Review request. An empty reaction means none was picked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub respondent_id: u64,
    pub rating: u8,
    #[serde(default)]
    pub reaction: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl ReviewRequest {
    /// Convert to a review draft, resolving the reaction label.
    pub fn to_draft(&self) -> Result<ReviewDraft, FinscopeError> {
        let reaction = match self.reaction.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(
                Reaction::from_label(label)
                    .ok_or_else(|| FinscopeError::UnknownReaction(label.to_string()))?,
            ),
        };

        Ok(ReviewDraft {
            respondent_id: RespondentId(self.respondent_id),
            rating: self.rating,
            reaction,
            feedback: self.feedback.clone().unwrap_or_default(),
        })
    }
}

/// Review response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub review_id: Option<u64>,
    pub error: Option<String>,
}

impl ReviewResponse {
    pub fn success(review_id: u64) -> Self {
        Self {
            success: true,
            review_id: Some(review_id),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            review_id: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// ADMIN
// =============================================================================

/// Export query parameters (`YYYY-MM-DD`, both optional).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// All recorded submissions with their reviews, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSubmissionsResponse {
    pub success: bool,
    pub total: usize,
    pub total_reviews: usize,
    /// Submission count per stage number, keyed `"1"`..`"5"`.
    pub stage_distribution: BTreeMap<String, usize>,
    pub assessments: Vec<ExportedAssessment>,
}

/// Generic error body for endpoints without a dedicated response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
