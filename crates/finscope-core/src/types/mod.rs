//! # Core Type Definitions
//!
//! This module contains the shared types of the assessment engine:
//! - Questionnaire identifiers (`QuestionId`, `OptionId`)
//! - The collected answers of one quiz session (`AnswerSet`)
//! - Ledger identifiers (`SubmissionId`, `RespondentId`, `ReviewId`)
//! - Error types (`FinscopeError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// QUESTIONNAIRE IDENTIFIERS
// =============================================================================

/// Identifier of a question in the questionnaire (e.g. `"excel-chaos"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    /// Create a new question identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a selected option.
///
/// In the current catalog every option id is the decimal form of its
/// maturity weight (`"1"`..`"5"`). Ids without a leading integer are carried
/// along untouched and ignored by the scorer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl OptionId {
    /// Create a new option identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric weight encoded in the identifier.
    ///
    /// Reads the leading integer: optional whitespace, optional sign, an
    /// optional `0x` prefix switching to hex, then the longest run of
    /// digits. Trailing text is ignored, so `"3a"` and `"4.0"` weigh 3 and 4.
    /// `None` when no digit follows the prefix.
    #[must_use]
    pub fn weight(&self) -> Option<i64> {
        leading_integer(&self.0)
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, s) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(rest) => (16, rest),
        None => (10, s),
    };

    let mut value: Option<i64> = None;
    for digit in s.chars().map_while(|c| c.to_digit(radix)) {
        let acc = value.unwrap_or(0);
        value = Some(
            acc.saturating_mul(i64::from(radix))
                .saturating_add(i64::from(digit)),
        );
    }
    value.map(|v| if negative { v.saturating_neg() } else { v })
}

// =============================================================================
// ANSWER SET
// =============================================================================

/// The collected answers of one quiz session.
///
/// Maps each answered question to its selected options, in click order.
/// Absent keys mean "unanswered". Uses `BTreeMap` so flattening is
/// deterministic across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(pub BTreeMap<QuestionId, Vec<OptionId>>);

impl AnswerSet {
    /// Create an empty answer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of one question's selections.
    #[must_use]
    pub fn with(mut self, question: &str, options: &[&str]) -> Self {
        self.insert(question, options);
        self
    }

    /// Replace the selections for a question.
    pub fn insert(&mut self, question: &str, options: &[&str]) {
        self.0.insert(
            QuestionId::new(question),
            options.iter().map(|o| OptionId::new(*o)).collect(),
        );
    }

    /// Append a single selection to a question, keeping click order.
    pub fn select(&mut self, question: &str, option: &str) {
        self.0
            .entry(QuestionId::new(question))
            .or_default()
            .push(OptionId::new(option));
    }

    /// Selections for a question, if it was answered.
    #[must_use]
    pub fn get(&self, question: &str) -> Option<&[OptionId]> {
        self.0
            .get(&QuestionId::new(question))
            .map(Vec::as_slice)
    }

    /// Iterate answered questions in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Vec<OptionId>)> {
        self.0.iter()
    }

    /// Iterate every selected option across all questions.
    pub fn selections(&self) -> impl Iterator<Item = &OptionId> {
        self.0.values().flatten()
    }

    /// Number of answered questions (keys), including empty selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no question has been answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of selected options across all questions.
    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl FromIterator<(QuestionId, Vec<OptionId>)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (QuestionId, Vec<OptionId>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// LEDGER IDENTIFIERS
// =============================================================================

/// Identifier of a recorded submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub u64);

/// Identifier of the person who submitted an assessment.
/// Reviews are attached to respondents, not submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RespondentId(pub u64);

/// Identifier of a recorded review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub u64);

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Finscope system.
///
/// The scorer itself never fails; these cover the layers around it.
#[derive(Debug, Error)]
pub enum FinscopeError {
    /// A required field was missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field exceeded its maximum length.
    #[error("Field '{field}' exceeds maximum length of {max} bytes")]
    FieldTooLong { field: &'static str, max: usize },

    /// No option was selected anywhere in the questionnaire.
    #[error("At least one option must be selected")]
    NoSelection,

    /// The answer set referenced a question that is not in the catalog.
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    /// A single-select question received more than one option.
    #[error("Question '{0}' accepts a single option")]
    TooManySelections(String),

    /// A review was submitted without a rating.
    #[error("A rating is required")]
    RatingRequired,

    /// A review rating was out of range.
    #[error("Rating {0} is out of range (1-5)")]
    InvalidRating(u8),

    /// A review reaction did not match any known label.
    #[error("Unknown reaction: {0}")]
    UnknownReaction(String),

    /// The referenced respondent does not exist in the ledger.
    #[error("Respondent not found: {0:?}")]
    RespondentNotFound(RespondentId),

    /// The ledger reached its entry limit.
    #[error("Ledger is full: {kind} limit of {max} reached")]
    LedgerFull { kind: &'static str, max: usize },

    /// An export date range was malformed or inverted.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl FinscopeError {
    /// Whether the error was caused by the caller's input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FinscopeError::MissingField(_)
                | FinscopeError::FieldTooLong { .. }
                | FinscopeError::NoSelection
                | FinscopeError::UnknownQuestion(_)
                | FinscopeError::TooManySelections(_)
                | FinscopeError::RatingRequired
                | FinscopeError::InvalidRating(_)
                | FinscopeError::UnknownReaction(_)
                | FinscopeError::InvalidDateRange(_)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_weight_parses_integers() {
        assert_eq!(OptionId::new("3").weight(), Some(3));
        assert_eq!(OptionId::new(" 4 ").weight(), Some(4));
        assert_eq!(OptionId::new("bad-id").weight(), None);
        assert_eq!(OptionId::new("").weight(), None);
    }

    #[test]
    fn option_weight_reads_leading_integer() {
        assert_eq!(OptionId::new("3a").weight(), Some(3));
        assert_eq!(OptionId::new("4.0").weight(), Some(4));
        assert_eq!(OptionId::new("  -2 stars").weight(), Some(-2));
        assert_eq!(OptionId::new("+5").weight(), Some(5));
        assert_eq!(OptionId::new("0x1F").weight(), Some(31));
        assert_eq!(OptionId::new("0x").weight(), None);
        assert_eq!(OptionId::new("-").weight(), None);
        assert_eq!(OptionId::new("a3").weight(), None);
        assert_eq!(
            OptionId::new("99999999999999999999999").weight(),
            Some(i64::MAX)
        );
    }

    #[test]
    fn answer_set_select_keeps_click_order() {
        let mut answers = AnswerSet::new();
        answers.select("q1", "3");
        answers.select("q1", "1");

        let ids: Vec<_> = answers
            .get("q1")
            .expect("answered")
            .iter()
            .map(OptionId::as_str)
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn answer_set_deterministic_ordering() {
        let answers = AnswerSet::new()
            .with("zeta", &["1"])
            .with("alpha", &["2"])
            .with("mid", &["3"]);

        let keys: Vec<_> = answers.iter().map(|(q, _)| q.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn answer_set_json_shape_is_plain_map() {
        let json = r#"{"erp-reality":["2","4"],"excel-chaos":["3"]}"#;
        let answers: AnswerSet = serde_json::from_str(json).expect("parse");

        assert_eq!(answers.len(), 2);
        assert_eq!(answers.selection_count(), 3);
        assert_eq!(serde_json::to_string(&answers).expect("serialize"), json);
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(FinscopeError::NoSelection.is_validation());
        assert!(FinscopeError::InvalidRating(9).is_validation());
        assert!(!FinscopeError::RespondentNotFound(RespondentId(1)).is_validation());
        assert!(!FinscopeError::IoError("x".into()).is_validation());
    }
}
