//! # Scoring Scenario Tests (S0-S3)
//!
//! Worked scenarios for the stage scorer and the content it selects.
//!
//! ## Tiers
//! - S0: Resolution Rules
//! - S1: Input Tolerance
//! - S2: Stage Table
//! - S3: End-to-End Submission

use finscope_core::{
    AnswerSet, FinscopeError, PersonalDetails, Resolution, STAGE_TABLE, Stage, Submission,
    compute_stage, descriptor_for, score,
};

fn answers(pairs: &[(&str, &[&str])]) -> AnswerSet {
    pairs
        .iter()
        .fold(AnswerSet::new(), |acc, (q, opts)| acc.with(q, opts))
}

// =============================================================================
// TIER S0: RESOLUTION RULES
// =============================================================================

mod s0_resolution_rules {
    use super::*;

    /// S0.1: Nothing answered scores stage 1.
    #[test]
    fn empty_is_stage_one() {
        assert_eq!(compute_stage(&AnswerSet::new()), Stage::S1);
    }

    /// S0.2: All answers equal.
    #[test]
    fn all_equal_values() {
        for stage in Stage::ALL {
            let id = stage.number().to_string();
            let set = answers(&[("a", &[id.as_str()]), ("b", &[id.as_str()])]);
            assert_eq!(compute_stage(&set), stage);
        }
    }

    /// S0.3: No repeats, the highest answer wins.
    #[test]
    fn all_distinct_takes_max() {
        let set = answers(&[("a", &["2"]), ("b", &["5"]), ("c", &["3"])]);
        assert_eq!(compute_stage(&set), Stage::S5);
    }

    /// S0.4: One value strictly most frequent.
    #[test]
    fn strict_majority() {
        let set = answers(&[("a", &["4"]), ("b", &["4"]), ("c", &["1"]), ("d", &["5"])]);
        assert_eq!(compute_stage(&set), Stage::S4);
    }

    /// S0.5: Tie between 1 and 3 resolves to 2.
    #[test]
    fn tie_floors_the_mean() {
        let report = score(&answers(&[("q1", &["1", "1", "3", "3", "5"])]));
        assert_eq!(report.stage, Stage::S2);
        assert_eq!(report.frequencies.count(1), 2);
        assert_eq!(report.frequencies.count(3), 2);
        assert_eq!(report.frequencies.count(5), 1);
    }

    /// S0.6: A three-way tie floors the mean of all tied values.
    #[test]
    fn three_way_tie() {
        let set = answers(&[("a", &["1", "1"]), ("b", &["2", "2"]), ("c", &["5", "5"])]);
        let report = score(&set);
        assert_eq!(report.resolution, Resolution::TiedMean { tied: vec![1, 2, 5] });
        assert_eq!(report.stage, Stage::S2);
    }
}

// =============================================================================
// TIER S1: INPUT TOLERANCE
// =============================================================================

mod s1_input_tolerance {
    use super::*;

    /// S1.1: Non-numeric ids are ignored.
    #[test]
    fn bad_ids_do_not_change_result() {
        let with_junk = answers(&[("q1", &["1", "1", "3"]), ("q2", &["bad-id"])]);
        let clean = answers(&[("q1", &["1", "1", "3"])]);

        assert_eq!(compute_stage(&with_junk), compute_stage(&clean));
        assert_eq!(compute_stage(&with_junk), Stage::S1);
    }

    /// S1.2: Only junk ids is the same as nothing answered.
    #[test]
    fn only_junk_is_stage_one() {
        let report = score(&answers(&[("q1", &["x", "y"])]));
        assert_eq!(report.stage, Stage::S1);
        assert_eq!(report.resolution, Resolution::Empty);
        assert_eq!(report.skipped, 2);
    }

    /// S1.3: Out-of-range values fall back to stage 1.
    #[test]
    fn out_of_range_falls_back() {
        assert_eq!(compute_stage(&answers(&[("q1", &["0"])])), Stage::S1);
        assert_eq!(compute_stage(&answers(&[("q1", &["42"])])), Stage::S1);
        assert_eq!(compute_stage(&answers(&[("q1", &["-3"])])), Stage::S1);
    }

    /// S1.4: Ids are read up to their leading integer.
    #[test]
    fn leading_integer_prefix_counts() {
        let report = score(&answers(&[("q1", &["3a"]), ("q2", &["1"])]));
        assert_eq!(report.values, vec![3, 1]);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.stage, Stage::S3);

        let decimal = answers(&[("q1", &["4.0"]), ("q2", &["2"])]);
        assert_eq!(compute_stage(&decimal), Stage::S4);
    }

    /// S1.5: Scoring is idempotent.
    #[test]
    fn idempotent() {
        let set = answers(&[("a", &["3"]), ("b", &["2"]), ("c", &["3"])]);
        assert_eq!(compute_stage(&set), compute_stage(&set));
    }
}

// =============================================================================
// TIER S2: STAGE TABLE
// =============================================================================

mod s2_stage_table {
    use super::*;

    /// S2.1: Every stage has complete content.
    #[test]
    fn every_descriptor_is_complete() {
        for descriptor in &STAGE_TABLE {
            assert!(!descriptor.title.is_empty());
            assert!(!descriptor.subtitle.is_empty());
            assert_eq!(descriptor.problems.len(), descriptor.solutions.len());
            assert!(!descriptor.problems.is_empty());
        }
    }

    /// S2.2: Lookup is total.
    #[test]
    fn lookup_is_total() {
        for n in -5..=10 {
            let descriptor = descriptor_for(n);
            assert!((1..=5).contains(&descriptor.stage.number()));
        }
        assert_eq!(descriptor_for(99).stage, Stage::S1);
        assert_eq!(descriptor_for(4).stage, Stage::S4);
    }
}

// =============================================================================
// TIER S3: END-TO-END SUBMISSION
// =============================================================================

mod s3_end_to_end {
    use super::*;
    use chrono::DateTime;

    /// S3.1: The four-question scenario lands on Stage 2.
    #[test]
    fn four_question_scenario() {
        let set = answers(&[
            ("excel-chaos", &["3"]),
            ("erp-reality", &["3"]),
            ("manual-misery", &["2"]),
            ("process-discipline", &["2"]),
        ]);

        let report = score(&set);
        assert_eq!(report.values, vec![3, 3, 2, 2]);
        assert_eq!(report.stage, Stage::S2);

        let descriptor = report.stage.descriptor();
        assert_eq!(descriptor.title, "Stage 2");
        assert_eq!(descriptor.subtitle, "Standardised & Controlled");
    }

    /// S3.2: A submission without selections is rejected.
    #[test]
    fn submission_needs_answers() {
        let at = DateTime::from_timestamp(0, 0).expect("timestamp");
        let result = Submission::build(PersonalDetails::new("Jane", "Acme"), AnswerSet::new(), at);
        assert!(matches!(result, Err(FinscopeError::NoSelection)));
    }
}
