//! # Stage Scorer
//!
//! Pure function pipeline from collected answers to a maturity stage:
//!
//! ```text
//! answers → option values → frequency table → tie-break → stage (1..=5)
//! ```
//!
//! ## Resolution Rules (evaluated in order)
//!
//! 1. No parseable values → stage 1.
//! 2. All values identical → that value.
//! 3. All values distinct → the maximum value.
//! 4. Otherwise the most frequent value wins; a tie between several
//!    most-frequent values resolves to the floor of their mean.
//!
//! Each option id contributes its leading integer (`"3a"` counts as 3); ids
//! with no leading integer are skipped, never an error.
//! A resolved value outside 1..=5 falls back to stage 1.

use crate::system::Stage;
use crate::AnswerSet;
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// FREQUENCY TABLE
// =============================================================================

/// Occurrence count of each distinct option value, ordered by value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FrequencyTable(BTreeMap<i64, usize>);

impl FrequencyTable {
    /// Count occurrences of each value.
    #[must_use]
    pub fn from_values(values: &[i64]) -> Self {
        let mut counts = BTreeMap::new();
        for &value in values {
            let count: &mut usize = counts.entry(value).or_default();
            *count = count.saturating_add(1);
        }
        Self(counts)
    }

    /// Number of distinct values.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.0.len()
    }

    /// Occurrence count of a value (0 if absent).
    #[must_use]
    pub fn count(&self, value: i64) -> usize {
        self.0.get(&value).copied().unwrap_or(0)
    }

    /// Highest occurrence count (0 for an empty table).
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.0.values().copied().max().unwrap_or(0)
    }

    /// Highest distinct value.
    #[must_use]
    pub fn max_value(&self) -> Option<i64> {
        self.0.keys().next_back().copied()
    }

    /// All values reaching the highest occurrence count, ascending.
    #[must_use]
    pub fn most_frequent(&self) -> Vec<i64> {
        let max_count = self.max_count();
        self.0
            .iter()
            .filter(|&(_, &count)| count == max_count)
            .map(|(&value, _)| value)
            .collect()
    }

    /// Iterate `(value, count)` pairs, ascending by value.
    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.0.iter().map(|(&v, &c)| (v, c))
    }
}

// =============================================================================
// SCORE REPORT
// =============================================================================

/// Which rule produced the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Resolution {
    /// Nothing to score; default stage.
    Empty,
    /// Every value was the same.
    AllIdentical,
    /// No value repeated; the best single answer sets the stage.
    AllDistinct,
    /// One value was strictly most frequent.
    MostFrequent,
    /// Several values tied for most frequent; floor of their mean.
    TiedMean { tied: Vec<i64> },
}

impl Resolution {
    /// Short rule name, as used in the serialized tag.
    #[must_use]
    pub fn rule(&self) -> &'static str {
        match self {
            Resolution::Empty => "empty",
            Resolution::AllIdentical => "all_identical",
            Resolution::AllDistinct => "all_distinct",
            Resolution::MostFrequent => "most_frequent",
            Resolution::TiedMean { .. } => "tied_mean",
        }
    }
}

/// Full trace of one scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    /// The resolved stage (always 1..=5).
    pub stage: Stage,
    /// The value chosen by the resolution rules, before range fallback.
    pub raw: i64,
    pub resolution: Resolution,
    /// Parsed option values in answer order.
    pub values: Vec<i64>,
    pub frequencies: FrequencyTable,
    /// Option ids that did not parse as integers.
    pub skipped: usize,
}

impl ScoreReport {
    /// Whether the raw value fell outside 1..=5 and was replaced by stage 1.
    #[must_use]
    pub fn fell_back(&self) -> bool {
        Stage::from_number(self.raw).is_none()
    }
}

// =============================================================================
// SCORER
// =============================================================================

/// Flatten an answer set into numeric values, counting unparseable ids.
#[must_use]
pub fn collect_values(answers: &AnswerSet) -> (Vec<i64>, usize) {
    let mut values = Vec::with_capacity(answers.selection_count());
    let mut skipped = 0usize;

    for option in answers.selections() {
        match option.weight() {
            Some(value) => values.push(value),
            None => skipped = skipped.saturating_add(1),
        }
    }

    (values, skipped)
}

/// Resolve a non-empty value list with the tie-break rules.
fn resolve(values: &[i64], frequencies: &FrequencyTable) -> (i64, Resolution) {
    let Some(max_value) = frequencies.max_value() else {
        return (Stage::DEFAULT.number(), Resolution::Empty);
    };

    if frequencies.distinct() == 1 {
        return (max_value, Resolution::AllIdentical);
    }

    if frequencies.distinct() == values.len() {
        return (max_value, Resolution::AllDistinct);
    }

    let tied = frequencies.most_frequent();
    match tied.as_slice() {
        [single] => (*single, Resolution::MostFrequent),
        _ => (floor_mean(&tied), Resolution::TiedMean { tied }),
    }
}

/// Floor of the arithmetic mean, integer only.
///
/// Summed in `i128` so no partial sum overflows; the mean of `i64` values
/// always fits back into `i64`.
fn floor_mean(values: &[i64]) -> i64 {
    let count = values.len().max(1) as i128;
    let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
    sum.div_euclid(count) as i64
}

/// Score an answer set and report how the stage was reached.
#[must_use]
pub fn score(answers: &AnswerSet) -> ScoreReport {
    let (values, skipped) = collect_values(answers);
    let frequencies = FrequencyTable::from_values(&values);

    let (raw, resolution) = if values.is_empty() {
        (Stage::DEFAULT.number(), Resolution::Empty)
    } else {
        resolve(&values, &frequencies)
    };

    ScoreReport {
        stage: Stage::from_number_or_default(raw),
        raw,
        resolution,
        values,
        frequencies,
        skipped,
    }
}

/// Compute the maturity stage for an answer set.
///
/// Pure and total: never fails, always returns a stage in 1..=5.
#[must_use]
pub fn compute_stage(answers: &AnswerSet) -> Stage {
    score(answers).stage
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &[&str])]) -> AnswerSet {
        pairs
            .iter()
            .fold(AnswerSet::new(), |acc, (q, opts)| acc.with(q, opts))
    }

    #[test]
    fn empty_answers_default_to_stage_one() {
        let report = score(&AnswerSet::new());
        assert_eq!(report.stage, Stage::S1);
        assert_eq!(report.resolution, Resolution::Empty);
    }

    #[test]
    fn answered_but_empty_selections_default_to_stage_one() {
        let report = score(&answers(&[("q1", &[]), ("q2", &[])]));
        assert_eq!(report.stage, Stage::S1);
        assert_eq!(report.resolution, Resolution::Empty);
    }

    #[test]
    fn all_identical_returns_value() {
        let report = score(&answers(&[("q1", &["4"]), ("q2", &["4"]), ("q3", &["4"])]));
        assert_eq!(report.stage, Stage::S4);
        assert_eq!(report.resolution, Resolution::AllIdentical);
    }

    #[test]
    fn all_distinct_returns_max() {
        let report = score(&answers(&[("q1", &["1"]), ("q2", &["4"]), ("q3", &["2"])]));
        assert_eq!(report.stage, Stage::S4);
        assert_eq!(report.resolution, Resolution::AllDistinct);
    }

    #[test]
    fn strict_most_frequent_wins() {
        let report = score(&answers(&[("q1", &["2", "2", "5"]), ("q2", &["2"])]));
        assert_eq!(report.stage, Stage::S2);
        assert_eq!(report.resolution, Resolution::MostFrequent);
    }

    #[test]
    fn tie_resolves_to_floor_of_mean() {
        let report = score(&answers(&[("q1", &["1", "1", "3", "3", "5"])]));
        assert_eq!(report.stage, Stage::S2);
        assert_eq!(report.resolution, Resolution::TiedMean { tied: vec![1, 3] });
    }

    #[test]
    fn non_numeric_ids_are_skipped_and_counted() {
        let report = score(&answers(&[("q1", &["1", "1", "3"]), ("q2", &["bad-id"])]));
        assert_eq!(report.stage, Stage::S1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.values, vec![1, 1, 3]);
    }

    #[test]
    fn out_of_range_value_falls_back_to_stage_one() {
        let report = score(&answers(&[("q1", &["9"])]));
        assert_eq!(report.raw, 9);
        assert!(report.fell_back());
        assert_eq!(report.stage, Stage::S1);
    }

    #[test]
    fn floor_mean_floors_negative_sums() {
        assert_eq!(floor_mean(&[2, 3]), 2);
        assert_eq!(floor_mean(&[-1, 0]), -1);
    }

    #[test]
    fn floor_mean_is_exact_at_the_extremes() {
        assert_eq!(floor_mean(&[i64::MIN, -4, 9, i64::MAX]), 1);
        assert_eq!(floor_mean(&[i64::MAX, i64::MAX]), i64::MAX);
        assert_eq!(floor_mean(&[i64::MIN, i64::MIN]), i64::MIN);
    }

    #[test]
    fn frequency_table_counts() {
        let table = FrequencyTable::from_values(&[3, 3, 2, 2, 5]);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.count(3), 2);
        assert_eq!(table.count(4), 0);
        assert_eq!(table.max_count(), 2);
        assert_eq!(table.most_frequent(), vec![2, 3]);
        assert_eq!(table.max_value(), Some(5));
    }
}
