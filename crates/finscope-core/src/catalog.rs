//! # Question Catalog
//!
//! The fixed questionnaire the answer sets are drawn from.
//!
//! Every option carries an explicit `weight`; its id is the decimal form of
//! that weight. The scorer only ever sees ids, so the two must stay in sync
//! (pinned by `option_ids_encode_weights` below).
//!
//! Each option may name the problem it reveals. The current questionnaire
//! leaves every problem text blank, so identified problems come out empty
//! until the catalog fills them in.

use crate::primitives::MAX_SELECTIONS_PER_QUESTION;
use crate::{AnswerSet, FinscopeError, OptionId};
use serde::Serialize;

// =============================================================================
// TYPES
// =============================================================================

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub id: &'static str,
    pub text: &'static str,
    pub weight: i64,
    /// Problem statement revealed by picking this option; may be blank.
    pub problem: &'static str,
}

/// One question of the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub description: &'static str,
    pub multi_select: bool,
    pub options: &'static [QuestionOption],
}

impl Question {
    /// Find an option of this question by id.
    #[must_use]
    pub fn find_option(&self, id: &str) -> Option<&'static QuestionOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

const fn option(
    id: &'static str,
    text: &'static str,
    weight: i64,
    problem: &'static str,
) -> QuestionOption {
    QuestionOption {
        id,
        text,
        weight,
        problem,
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// The questionnaire, in presentation order.
pub static QUESTIONS: [Question; 4] = [
    Question {
        id: "excel-chaos",
        text: "Be Honest",
        description: "How chaotic (or smooth) is your Excel situation?",
        multi_select: false,
        options: &[
            option("1", "Disjointed Excel", 1, ""),
            option("2", "Very basic dashboards", 2, ""),
            option("3", "Real-time data flows between spreadsheets", 3, ""),
            option("4", "Dynamic MIS and macros", 4, ""),
            option("5", "Predictive Analysis", 5, ""),
        ],
    },
    Question {
        id: "erp-reality",
        text: "ERP Reality Check",
        description: "Where does your ERP journey stand today?",
        multi_select: false,
        options: &[
            option("1", "Accounting is on Tally, no other major tools", 1, ""),
            option("2", "Patchwork ERP/Systems in silo", 2, ""),
            option("3", "Sophisticated ERP system but no integrations", 3, ""),
            option("4", "Highly automated integrations and ERP system", 4, ""),
            option(
                "5",
                "Only Financial Statement preparation is manual (Everything else is automated within the ERP/outside the ERP)",
                5,
                "",
            ),
        ],
    },
    Question {
        id: "manual-misery",
        text: "Manual Work Misery",
        description: "How much is your finance team stuck in manual mode?",
        multi_select: false,
        options: &[
            option("1", "Excessive manual work", 1, ""),
            option("2", "Mostly manual work, but accounting is on ERP", 2, ""),
            option("3", "Core finance on ERP, reconciliations done outside the system", 3, ""),
            option("4", "Completely automated, but scope for improvement", 4, ""),
            option("5", "Investment-ready/global best practices adopted", 5, ""),
        ],
    },
    Question {
        id: "process-discipline",
        text: "Process Discipline",
        description: "How solid are your finance processes on paper?",
        multi_select: false,
        options: &[
            option("1", "No documented SOPs", 1, ""),
            option("2", "Processes are consistent, but not linked to best practices", 2, ""),
            option("3", "Best practices adopted, not sure of adherence", 3, ""),
            option("4", "Documented and adopted best practices", 4, ""),
            option("5", "IFC, ICFR and all ELCs (Entity Level Controls) in place", 5, ""),
        ],
    },
];

/// All questions in presentation order.
#[must_use]
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

/// Find a question by id.
#[must_use]
pub fn find_question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Resolve a selected option against the catalog.
#[must_use]
pub fn resolve_option(question: &str, option: &OptionId) -> Option<&'static QuestionOption> {
    find_question(question)?.find_option(option.as_str())
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Whether at least one option is selected anywhere in the answer set.
#[must_use]
pub fn has_selection(answers: &AnswerSet) -> bool {
    answers.selections().next().is_some()
}

/// Check an answer set against the catalog's structure.
///
/// Rejects unknown questions and multiple selections on single-select
/// questions. Unknown or non-numeric option ids are accepted: the scorer
/// skips them rather than failing the quiz.
pub fn validate_answers(answers: &AnswerSet) -> Result<(), FinscopeError> {
    for (question_id, options) in answers.iter() {
        let question = find_question(question_id.as_str())
            .ok_or_else(|| FinscopeError::UnknownQuestion(question_id.as_str().to_string()))?;

        if options.len() > MAX_SELECTIONS_PER_QUESTION
            || (!question.multi_select && options.len() > 1)
        {
            return Err(FinscopeError::TooManySelections(question.id.to_string()));
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_ids_encode_weights() {
        for question in questions() {
            for opt in question.options {
                assert_eq!(opt.id, opt.weight.to_string(), "{}", question.id);
                assert_eq!(OptionId::new(opt.id).weight(), Some(opt.weight));
            }
        }
    }

    #[test]
    fn catalog_problem_texts_are_blank() {
        for question in questions() {
            for opt in question.options {
                assert_eq!(opt.problem, "", "{}/{}", question.id, opt.id);
            }
        }
    }

    #[test]
    fn validate_rejects_unknown_question() {
        let answers = AnswerSet::new().with("not-a-question", &["1"]);
        assert!(matches!(
            validate_answers(&answers),
            Err(FinscopeError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn validate_rejects_multiple_on_single_select() {
        let answers = AnswerSet::new().with("excel-chaos", &["1", "2"]);
        assert!(matches!(
            validate_answers(&answers),
            Err(FinscopeError::TooManySelections(_))
        ));
    }

    #[test]
    fn validate_tolerates_unknown_option_ids() {
        let answers = AnswerSet::new()
            .with("excel-chaos", &["bad-id"])
            .with("erp-reality", &[]);
        assert!(validate_answers(&answers).is_ok());
    }

    #[test]
    fn has_selection_ignores_empty_questions() {
        assert!(!has_selection(&AnswerSet::new()));
        assert!(!has_selection(&AnswerSet::new().with("excel-chaos", &[])));
        assert!(has_selection(&AnswerSet::new().with("excel-chaos", &["2"])));
    }
}
