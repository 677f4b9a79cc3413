//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! The wall clock is read here and nowhere in the core.

use super::{
    AppState,
    types::{
        AdminSubmissionsResponse, ErrorResponse, ExportQuery, HealthResponse, QuestionJson,
        ReviewRequest, ReviewResponse, ScoreRequest, ScoreResponse, StageJson, SubmissionRequest,
        SubmissionResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use finscope_core::{
    DateRange, FinscopeError, STAGE_TABLE, Submission, build_export, descriptor_for,
    export_filename, primitives::MAX_SCORE_SELECTIONS, questions, score, to_json_pretty,
};

/// HTTP status for a core error.
pub fn error_status(error: &FinscopeError) -> StatusCode {
    match error {
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        FinscopeError::RespondentNotFound(_) => StatusCode::NOT_FOUND,
        FinscopeError::LedgerFull { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CATALOG HANDLERS
// =============================================================================

/// List the questionnaire.
pub async fn questions_handler() -> impl IntoResponse {
    let body: Vec<QuestionJson> = questions().iter().map(QuestionJson::from).collect();
    Json(body)
}

/// List all stage descriptors.
pub async fn stages_handler() -> impl IntoResponse {
    let body: Vec<StageJson> = STAGE_TABLE.iter().map(StageJson::from).collect();
    Json(body)
}

/// Look up one stage descriptor. Out-of-range numbers resolve to stage 1.
pub async fn stage_handler(Path(number): Path<i64>) -> impl IntoResponse {
    Json(StageJson::from(descriptor_for(number)))
}

// =============================================================================
// SCORE HANDLER
// =============================================================================

/// Score an answer set without recording anything.
pub async fn score_handler(Json(request): Json<ScoreRequest>) -> impl IntoResponse {
    let selections = request.answers.selection_count();
    if selections > MAX_SCORE_SELECTIONS {
        return (
            StatusCode::BAD_REQUEST,
            Json(ScoreResponse::error(format!(
                "Selection count {} exceeds maximum {}",
                selections, MAX_SCORE_SELECTIONS
            ))),
        );
    }

    let report = score(&request.answers);
    if report.skipped > 0 {
        tracing::warn!(
            skipped = report.skipped,
            "Ignored option ids that are not numeric"
        );
    }
    tracing::debug!(
        stage = report.stage.number(),
        rule = report.resolution.rule(),
        skipped = report.skipped,
        "Scored answer set"
    );
    (StatusCode::OK, Json(ScoreResponse::success(&report)))
}

// =============================================================================
// SUBMISSION HANDLER
// =============================================================================

/// Validate, score and record a finished questionnaire.
pub async fn submission_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> impl IntoResponse {
    let submission = match Submission::build(request.personal_details, request.answers, Utc::now())
    {
        Ok(s) => s,
        Err(e) => {
            return (
                error_status(&e),
                Json(SubmissionResponse::error(format!("Invalid submission: {}", e))),
            );
        }
    };

    let mut ledger = state.ledger.write().await;
    let record = match ledger.record_submission(submission) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(event = "ledger_full", "Submission rejected: {}", e);
            return (
                error_status(&e),
                Json(SubmissionResponse::error(format!("Submission failed: {}", e))),
            );
        }
    };

    tracing::info!(
        event = "submission_recorded",
        submission_id = record.id.0,
        respondent_id = record.respondent_id.0,
        stage = record.submission.stage.number(),
        "Submission recorded"
    );

    let response = SubmissionResponse {
        success: true,
        submission_id: Some(record.id.0),
        respondent_id: Some(record.respondent_id.0),
        email: Some(record.submission.email.clone()),
        stage: Some(StageJson::from(record.submission.stage.descriptor())),
        identified_problems: record.submission.identified_problems.clone(),
        error: None,
    };
    (StatusCode::OK, Json(response))
}

// =============================================================================
// REVIEW HANDLER
// =============================================================================

/// Record a review for an existing respondent.
pub async fn review_handler(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> impl IntoResponse {
    let draft = match request.to_draft() {
        Ok(d) => d,
        Err(e) => {
            return (
                error_status(&e),
                Json(ReviewResponse::error(format!("Invalid review: {}", e))),
            );
        }
    };

    let mut ledger = state.ledger.write().await;
    match ledger.record_review(draft, Utc::now()) {
        Ok(review) => {
            tracing::info!(
                event = "review_recorded",
                review_id = review.id.0,
                respondent_id = review.respondent_id.0,
                rating = review.rating,
                "Review recorded"
            );
            (StatusCode::OK, Json(ReviewResponse::success(review.id.0)))
        }
        Err(e) => (
            error_status(&e),
            Json(ReviewResponse::error(format!("Review failed: {}", e))),
        ),
    }
}

// =============================================================================
// ADMIN HANDLERS
// =============================================================================

/// All submissions with their reviews, newest first.
pub async fn admin_submissions_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    let document = build_export(&ledger, &DateRange::all(), Utc::now());

    let response = AdminSubmissionsResponse {
        success: true,
        total: document.summary.total_assessments,
        total_reviews: ledger.review_count(),
        stage_distribution: ledger
            .stage_distribution()
            .into_iter()
            .map(|(stage, count)| (stage.number().to_string(), count))
            .collect(),
        assessments: document.assessments,
    };
    (StatusCode::OK, Json(response))
}

/// Download the export document for an optional date range.
pub async fn admin_export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let range = match DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            return (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response();
        }
    };

    let now = Utc::now();
    let ledger = state.ledger.read().await;
    let document = build_export(&ledger, &range, now);

    match to_json_pretty(&document) {
        Ok(body) => {
            tracing::info!(
                event = "export_generated",
                total = document.summary.total_assessments,
                "Export generated"
            );
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_filename(now.date_naive())
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}
