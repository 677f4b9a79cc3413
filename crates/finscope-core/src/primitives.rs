//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Finscope assessment engine.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Lowest maturity stage, also the default for empty or skipped questionnaires.
pub const MIN_STAGE: i64 = 1;

/// Highest maturity stage.
pub const MAX_STAGE: i64 = 5;

/// Form type tag attached to every submission payload.
pub const FORM_TYPE: &str = "financial-assessment";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for person and company names.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for optional contact fields (designation, phone number).
pub const MAX_CONTACT_FIELD_LENGTH: usize = 128;

/// Maximum length for a written review message.
pub const MAX_FEEDBACK_LENGTH: usize = 4096;

/// Maximum rating value for a review (star count).
pub const MAX_RATING: u8 = 5;

/// Maximum number of selections accepted for one question.
///
/// Bounds payload size at the API boundary; no catalog question has more
/// options than this.
pub const MAX_SELECTIONS_PER_QUESTION: usize = 16;

/// Maximum number of selections accepted by a stand-alone scoring request.
pub const MAX_SCORE_SELECTIONS: usize = 1024;

/// Default cap on submissions, and separately on reviews, held by one ledger.
///
/// The ledger is memory-only; once full it refuses new entries.
pub const MAX_LEDGER_ENTRIES: usize = 100_000;
