//! # Ledger Module
//!
//! Volatile, process-local record of submissions and reviews.
//!
//! - Lives in memory only; never serialized to disk
//! - Identifiers are assigned sequentially, starting at 1
//! - Submissions and reviews are each capped; a full ledger rejects new entries
//! - Every submission creates a new respondent; reviews attach to respondents

use crate::export::DateRange;
use crate::primitives::MAX_LEDGER_ENTRIES;
use crate::review::{Reaction, ReviewDraft};
use crate::submission::Submission;
use crate::system::Stage;
use crate::{FinscopeError, RespondentId, ReviewId, SubmissionId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A submission as stored in the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub respondent_id: RespondentId,
    #[serde(flatten)]
    pub submission: Submission,
}

/// A recorded review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub respondent_id: RespondentId,
    pub rating: u8,
    pub reaction: Option<Reaction>,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory store of everything submitted to one server process.
#[derive(Debug)]
pub struct AssessmentLedger {
    submissions: BTreeMap<SubmissionId, SubmissionRecord>,
    reviews: BTreeMap<ReviewId, Review>,
    next_submission: u64,
    next_respondent: u64,
    next_review: u64,
    max_entries: usize,
}

impl Default for AssessmentLedger {
    fn default() -> Self {
        Self::with_limit(MAX_LEDGER_ENTRIES)
    }
}

impl AssessmentLedger {
    /// Create an empty ledger with the default entry limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger holding at most `max_entries` submissions and
    /// `max_entries` reviews.
    #[must_use]
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            submissions: BTreeMap::new(),
            reviews: BTreeMap::new(),
            next_submission: 0,
            next_respondent: 0,
            next_review: 0,
            max_entries,
        }
    }

    /// Record a built submission under a fresh respondent.
    ///
    /// # Errors
    /// - `LedgerFull` once the submission limit is reached
    pub fn record_submission(
        &mut self,
        submission: Submission,
    ) -> Result<&SubmissionRecord, FinscopeError> {
        if self.submissions.len() >= self.max_entries {
            return Err(FinscopeError::LedgerFull {
                kind: "submission",
                max: self.max_entries,
            });
        }

        self.next_submission = self.next_submission.saturating_add(1);
        self.next_respondent = self.next_respondent.saturating_add(1);

        let id = SubmissionId(self.next_submission);
        let record = SubmissionRecord {
            id,
            respondent_id: RespondentId(self.next_respondent),
            submission,
        };
        Ok(self.submissions.entry(id).or_insert(record))
    }

    /// Validate and record a review for an existing respondent.
    ///
    /// # Errors
    /// - Validation errors from [`ReviewDraft::validate`]
    /// - `RespondentNotFound` if no submission belongs to the respondent
    /// - `LedgerFull` once the review limit is reached
    pub fn record_review(
        &mut self,
        draft: ReviewDraft,
        created_at: DateTime<Utc>,
    ) -> Result<&Review, FinscopeError> {
        draft.validate()?;
        if self.find_by_respondent(draft.respondent_id).is_none() {
            return Err(FinscopeError::RespondentNotFound(draft.respondent_id));
        }
        if self.reviews.len() >= self.max_entries {
            return Err(FinscopeError::LedgerFull {
                kind: "review",
                max: self.max_entries,
            });
        }

        self.next_review = self.next_review.saturating_add(1);
        let id = ReviewId(self.next_review);
        let review = Review {
            id,
            respondent_id: draft.respondent_id,
            rating: draft.rating,
            reaction: draft.reaction,
            feedback: draft.feedback,
            created_at,
        };
        Ok(self.reviews.entry(id).or_insert(review))
    }

    /// Get a submission by id.
    #[must_use]
    pub fn get(&self, id: SubmissionId) -> Option<&SubmissionRecord> {
        self.submissions.get(&id)
    }

    /// Find the submission made by a respondent.
    #[must_use]
    pub fn find_by_respondent(&self, respondent: RespondentId) -> Option<&SubmissionRecord> {
        self.submissions
            .values()
            .find(|record| record.respondent_id == respondent)
    }

    /// All submissions in id (insertion) order.
    pub fn submissions(&self) -> impl Iterator<Item = &SubmissionRecord> {
        self.submissions.values()
    }

    /// Reviews left by a respondent, oldest first.
    #[must_use]
    pub fn reviews_for(&self, respondent: RespondentId) -> Vec<&Review> {
        self.reviews
            .values()
            .filter(|review| review.respondent_id == respondent)
            .collect()
    }

    /// Number of reviews recorded.
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Number of submissions recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    /// Whether no submission has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Submissions whose timestamp falls inside the range, newest first.
    #[must_use]
    pub fn in_range(&self, range: &DateRange) -> Vec<&SubmissionRecord> {
        let mut records: Vec<_> = self
            .submissions
            .values()
            .filter(|record| range.contains(record.submission.submitted_at))
            .collect();
        records.sort_by(|a, b| {
            b.submission
                .submitted_at
                .cmp(&a.submission.submitted_at)
                .then(b.id.cmp(&a.id))
        });
        records
    }

    /// Number of submissions per stage; every stage is present.
    #[must_use]
    pub fn stage_distribution(&self) -> BTreeMap<Stage, usize> {
        let mut distribution: BTreeMap<Stage, usize> =
            Stage::ALL.iter().map(|&stage| (stage, 0)).collect();
        for record in self.submissions.values() {
            let count = distribution.entry(record.submission.stage).or_default();
            *count = count.saturating_add(1);
        }
        distribution
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnswerSet;
    use crate::submission::PersonalDetails;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    fn submission(option: &str, secs: i64) -> Submission {
        Submission::build(
            PersonalDetails::new("Jane Doe", "Acme"),
            AnswerSet::new().with("excel-chaos", &[option]),
            at(secs),
        )
        .expect("build")
    }

    fn review(respondent: RespondentId, rating: u8) -> ReviewDraft {
        ReviewDraft {
            respondent_id: respondent,
            rating,
            reaction: None,
            feedback: String::new(),
        }
    }

    #[test]
    fn ids_are_sequential() {
        let mut ledger = AssessmentLedger::new();
        let first = ledger.record_submission(submission("1", 0)).expect("record").id;
        let second = ledger.record_submission(submission("2", 0)).expect("record").id;

        assert_eq!(first, SubmissionId(1));
        assert_eq!(second, SubmissionId(2));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn review_requires_known_respondent() {
        let mut ledger = AssessmentLedger::new();
        let result = ledger.record_review(review(RespondentId(7), 5), at(0));
        assert!(matches!(result, Err(FinscopeError::RespondentNotFound(_))));
    }

    #[test]
    fn review_attaches_to_respondent() {
        let mut ledger = AssessmentLedger::new();
        let respondent = ledger
            .record_submission(submission("3", 0))
            .expect("record")
            .respondent_id;

        ledger
            .record_review(review(respondent, 4), at(10))
            .expect("review");

        let reviews = ledger.reviews_for(respondent);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 4);
        assert_eq!(ledger.review_count(), 1);
    }

    #[test]
    fn invalid_review_is_not_recorded() {
        let mut ledger = AssessmentLedger::new();
        let respondent = ledger
            .record_submission(submission("3", 0))
            .expect("record")
            .respondent_id;

        assert!(ledger.record_review(review(respondent, 0), at(0)).is_err());
        assert_eq!(ledger.review_count(), 0);
    }

    #[test]
    fn in_range_is_newest_first() {
        let mut ledger = AssessmentLedger::new();
        ledger.record_submission(submission("1", 100)).expect("record");
        ledger.record_submission(submission("2", 300)).expect("record");
        ledger.record_submission(submission("3", 200)).expect("record");

        let ordered: Vec<_> = ledger
            .in_range(&DateRange::default())
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ordered, vec![SubmissionId(2), SubmissionId(3), SubmissionId(1)]);
    }

    #[test]
    fn full_ledger_rejects_new_submissions() {
        let mut ledger = AssessmentLedger::with_limit(2);
        ledger.record_submission(submission("1", 0)).expect("record");
        ledger.record_submission(submission("2", 0)).expect("record");

        let result = ledger.record_submission(submission("3", 0));
        assert!(matches!(
            result,
            Err(FinscopeError::LedgerFull { kind: "submission", max: 2 })
        ));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn full_ledger_rejects_new_reviews() {
        let mut ledger = AssessmentLedger::with_limit(1);
        let respondent = ledger
            .record_submission(submission("4", 0))
            .expect("record")
            .respondent_id;
        ledger
            .record_review(review(respondent, 5), at(1))
            .expect("review");

        let result = ledger.record_review(review(respondent, 3), at(2));
        assert!(matches!(result, Err(FinscopeError::LedgerFull { kind: "review", .. })));
        assert_eq!(ledger.review_count(), 1);
    }

    #[test]
    fn stage_distribution_covers_all_stages() {
        let mut ledger = AssessmentLedger::new();
        ledger.record_submission(submission("2", 0)).expect("record");
        ledger.record_submission(submission("2", 0)).expect("record");

        let distribution = ledger.stage_distribution();
        assert_eq!(distribution.len(), 5);
        assert_eq!(distribution[&Stage::S2], 2);
        assert_eq!(distribution[&Stage::S5], 0);
    }
}
