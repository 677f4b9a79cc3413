//! # finscope-core
//!
//! The deterministic assessment engine for Finscope - THE LOGIC.
//!
//! This crate turns the answers of a short finance-maturity questionnaire
//! into one of five maturity stages, and carries the static content that
//! goes with each stage.
//!
//! ## Layout
//!
//! - `types` / `primitives` → identifiers, answer sets, errors, limits
//! - `catalog` → the fixed questionnaire
//! - `system` → the stage table
//! - `scoring` → the stage scorer
//! - `submission` / `review` → what a respondent hands in
//! - `ledger` / `export` → volatile record keeping and the admin export
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never reads the clock; timestamps are passed in
//! - Uses `BTreeMap`/`BTreeSet` only and integer arithmetic only
//! - Keeps the scorer total: every answer set maps to a stage in 1..=5

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod export;
pub mod ledger;
pub mod primitives;
pub mod review;
pub mod scoring;
pub mod submission;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AnswerSet, FinscopeError, OptionId, QuestionId, RespondentId, ReviewId, SubmissionId,
};

// =============================================================================
// RE-EXPORTS: Assessment Engine
// =============================================================================

pub use catalog::{Question, QuestionOption, find_question, questions, validate_answers};
pub use export::{DateRange, ExportDocument, build_export, export_filename, to_json_pretty};
pub use ledger::{AssessmentLedger, Review, SubmissionRecord};
pub use review::{Reaction, ReviewDraft};
pub use scoring::{FrequencyTable, Resolution, ScoreReport, compute_stage, score};
pub use submission::{PersonalDetails, Submission, derive_email};

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::{CallToAction, STAGE_TABLE, Stage, StageDescriptor, descriptor_for};
