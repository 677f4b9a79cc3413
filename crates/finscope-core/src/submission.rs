//! # Submission Builder
//!
//! Assembles the payload recorded when a respondent finishes the quiz:
//! contact details, raw and detailed answers, identified problems and the
//! scored stage with its problems and solutions.
//!
//! - Full name and company name are required
//! - At least one option must be selected somewhere in the questionnaire
//! - The stage is computed once, here, from the frozen answer set

use crate::catalog::{self, Question};
use crate::primitives::{FORM_TYPE, MAX_CONTACT_FIELD_LENGTH, MAX_NAME_LENGTH};
use crate::scoring::{self, ScoreReport};
use crate::system::Stage;
use crate::{AnswerSet, FinscopeError, OptionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// PERSONAL DETAILS
// =============================================================================

/// Contact details collected after the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl PersonalDetails {
    /// Create details with the two required fields.
    #[must_use]
    pub fn new(full_name: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            company_name: company_name.into(),
            designation: None,
            phone_number: None,
        }
    }

    /// Validate required fields and length limits.
    pub fn validate(&self) -> Result<(), FinscopeError> {
        require("full_name", &self.full_name, MAX_NAME_LENGTH)?;
        require("company_name", &self.company_name, MAX_NAME_LENGTH)?;

        if let Some(designation) = &self.designation {
            limit("designation", designation, MAX_CONTACT_FIELD_LENGTH)?;
        }
        if let Some(phone) = &self.phone_number {
            limit("phone_number", phone, MAX_CONTACT_FIELD_LENGTH)?;
        }
        Ok(())
    }

    /// Contact email derived from name and company.
    #[must_use]
    pub fn email(&self) -> String {
        derive_email(&self.full_name, &self.company_name)
    }
}

fn require(field: &'static str, value: &str, max: usize) -> Result<(), FinscopeError> {
    if value.trim().is_empty() {
        return Err(FinscopeError::MissingField(field));
    }
    limit(field, value, max)
}

fn limit(field: &'static str, value: &str, max: usize) -> Result<(), FinscopeError> {
    if value.len() > max {
        return Err(FinscopeError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Derive a contact address: `first.last@company.com`.
///
/// The name is lowercased and every whitespace run becomes a single `.`,
/// including runs at either end (`" Jo  Doe "` gives `.jo.doe.`); the
/// company is lowercased with all whitespace removed.
#[must_use]
pub fn derive_email(full_name: &str, company_name: &str) -> String {
    let mut local = String::with_capacity(full_name.len());
    let mut in_run = false;
    for c in full_name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_run {
                local.push('.');
            }
            in_run = true;
        } else {
            local.push(c);
            in_run = false;
        }
    }
    let domain: String = company_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{}@{}.com", local, domain)
}

// =============================================================================
// DETAILED RESPONSES
// =============================================================================

/// A selected option resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub id: String,
    pub text: String,
    pub problem: String,
}

/// One answered question with its resolved selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question_id: String,
    pub question_text: String,
    pub question_description: String,
    pub multi_select: bool,
    pub selected_options: Vec<SelectedOption>,
}

/// Resolve answered catalog questions to their full text, in catalog order.
///
/// Questions missing from the catalog are dropped, as are selections whose
/// option id is not part of the question.
#[must_use]
pub fn questions_with_responses(answers: &AnswerSet) -> Vec<QuestionResponse> {
    answered(catalog::questions(), answers)
        .map(|(question, options)| QuestionResponse {
            question_id: question.id.to_string(),
            question_text: question.text.to_string(),
            question_description: question.description.to_string(),
            multi_select: question.multi_select,
            selected_options: options
                .iter()
                .filter_map(|id| resolve_selected(question, id.as_str()))
                .collect(),
        })
        .collect()
}

/// Catalog questions that have an entry in the answer set, in catalog order.
fn answered<'a>(
    questions: &'a [Question],
    answers: &'a AnswerSet,
) -> impl Iterator<Item = (&'a Question, &'a [OptionId])> {
    questions
        .iter()
        .filter_map(move |question| Some((question, answers.get(question.id)?)))
}

fn resolve_selected(question: &Question, id: &str) -> Option<SelectedOption> {
    let option = question.find_option(id)?;
    Some(SelectedOption {
        id: option.id.to_string(),
        text: option.text.to_string(),
        problem: option.problem.to_string(),
    })
}

/// Problem statements of every selected catalog option.
///
/// Walks the catalog in order; de-duplicated, first occurrence wins; blanks
/// are dropped.
#[must_use]
pub fn identified_problems(answers: &AnswerSet) -> Vec<String> {
    compile_problems(catalog::questions(), answers)
}

fn compile_problems(questions: &[Question], answers: &AnswerSet) -> Vec<String> {
    let mut seen = BTreeSet::new();
    answered(questions, answers)
        .flat_map(|(question, options)| {
            options
                .iter()
                .filter_map(move |id| question.find_option(id.as_str()))
        })
        .map(|option| option.problem)
        .filter(|problem| !problem.trim().is_empty() && seen.insert(*problem))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// The complete record of one finished assessment.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub personal_details: PersonalDetails,
    pub email: String,
    pub form_type: &'static str,
    pub answers: AnswerSet,
    pub questions_with_responses: Vec<QuestionResponse>,
    pub identified_problems: Vec<String>,
    pub stage: Stage,
    pub stage_title: &'static str,
    pub stage_subtitle: &'static str,
    pub problems: Vec<String>,
    pub solutions: Vec<String>,
    pub score: ScoreReport,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Validate, score and assemble a submission.
    ///
    /// # Errors
    /// - `MissingField` / `FieldTooLong` for invalid personal details
    /// - `UnknownQuestion` / `TooManySelections` for malformed answers
    /// - `NoSelection` if no option was selected at all
    pub fn build(
        details: PersonalDetails,
        answers: AnswerSet,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, FinscopeError> {
        details.validate()?;
        catalog::validate_answers(&answers)?;
        if !catalog::has_selection(&answers) {
            return Err(FinscopeError::NoSelection);
        }

        let score = scoring::score(&answers);
        let descriptor = score.stage.descriptor();

        Ok(Self {
            email: details.email(),
            personal_details: details,
            form_type: FORM_TYPE,
            questions_with_responses: questions_with_responses(&answers),
            identified_problems: identified_problems(&answers),
            stage: score.stage,
            stage_title: descriptor.title,
            stage_subtitle: descriptor.subtitle,
            problems: descriptor.problems.iter().map(|p| p.to_string()).collect(),
            solutions: descriptor.solutions.iter().map(|s| s.to_string()).collect(),
            answers,
            score,
            submitted_at,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionOption;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).expect("valid timestamp")
    }

    #[test]
    fn email_is_derived_from_name_and_company() {
        assert_eq!(
            derive_email("Jane  Q Doe", "Acme Holdings Ltd"),
            "jane.q.doe@acmeholdingsltd.com"
        );
    }

    #[test]
    fn email_keeps_edge_whitespace_as_dots() {
        assert_eq!(derive_email(" John  Doe ", " Big\tCo "), ".john.doe.@bigco.com");
    }

    #[test]
    fn validate_requires_name_and_company() {
        assert!(matches!(
            PersonalDetails::new("  ", "Acme").validate(),
            Err(FinscopeError::MissingField("full_name"))
        ));
        assert!(matches!(
            PersonalDetails::new("Jane", "").validate(),
            Err(FinscopeError::MissingField("company_name"))
        ));
        assert!(PersonalDetails::new("Jane", "Acme").validate().is_ok());
    }

    #[test]
    fn validate_bounds_optional_fields() {
        let mut details = PersonalDetails::new("Jane", "Acme");
        details.phone_number = Some("9".repeat(MAX_CONTACT_FIELD_LENGTH + 1));
        assert!(matches!(
            details.validate(),
            Err(FinscopeError::FieldTooLong { field: "phone_number", .. })
        ));
    }

    static SAMPLE_QUESTIONS: [Question; 2] = [
        Question {
            id: "zeta-first",
            text: "Zeta",
            description: "",
            multi_select: true,
            options: &[
                QuestionOption {
                    id: "1",
                    text: "One",
                    weight: 1,
                    problem: "Books are late",
                },
                QuestionOption {
                    id: "2",
                    text: "Two",
                    weight: 2,
                    problem: "  ",
                },
            ],
        },
        Question {
            id: "alpha-second",
            text: "Alpha",
            description: "",
            multi_select: true,
            options: &[
                QuestionOption {
                    id: "1",
                    text: "One",
                    weight: 1,
                    problem: "No reconciliations",
                },
                QuestionOption {
                    id: "2",
                    text: "Two",
                    weight: 2,
                    problem: "Books are late",
                },
            ],
        },
    ];

    #[test]
    fn problems_follow_catalog_order_and_deduplicate() {
        let answers = AnswerSet::new()
            .with("alpha-second", &["2", "1"])
            .with("zeta-first", &["1", "2", "9"]);
        assert_eq!(
            compile_problems(&SAMPLE_QUESTIONS, &answers),
            vec!["Books are late".to_string(), "No reconciliations".to_string()]
        );
    }

    #[test]
    fn current_catalog_identifies_no_problems() {
        let answers = AnswerSet::new()
            .with("excel-chaos", &["1"])
            .with("erp-reality", &["2"]);
        assert!(identified_problems(&answers).is_empty());
    }

    #[test]
    fn detailed_responses_follow_catalog_order() {
        let answers = AnswerSet::new()
            .with("process-discipline", &["4"])
            .with("excel-chaos", &["2"])
            .with("erp-reality", &["3"]);
        let ids: Vec<_> = questions_with_responses(&answers)
            .into_iter()
            .map(|r| r.question_id)
            .collect();
        assert_eq!(ids, vec!["excel-chaos", "erp-reality", "process-discipline"]);
    }

    #[test]
    fn detailed_responses_skip_unknown_options() {
        let answers = AnswerSet::new().with("erp-reality", &["bad-id"]);
        let responses = questions_with_responses(&answers);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].question_text, "ERP Reality Check");
        assert!(responses[0].selected_options.is_empty());
    }

    #[test]
    fn build_scores_and_attaches_stage_content() {
        let answers = AnswerSet::new()
            .with("excel-chaos", &["3"])
            .with("erp-reality", &["3"])
            .with("manual-misery", &["2"])
            .with("process-discipline", &["2"]);

        let submission =
            Submission::build(PersonalDetails::new("Jane Doe", "Acme"), answers, fixed_time())
                .expect("build");

        assert_eq!(submission.stage, Stage::S2);
        assert_eq!(submission.stage_title, "Stage 2");
        assert_eq!(submission.stage_subtitle, "Standardised & Controlled");
        assert_eq!(submission.problems.len(), submission.solutions.len());
        assert_eq!(submission.email, "jane.doe@acme.com");
        assert_eq!(submission.form_type, "financial-assessment");
        assert!(submission.identified_problems.is_empty());
    }

    #[test]
    fn build_requires_a_selection() {
        let answers = AnswerSet::new().with("excel-chaos", &[]);
        let result = Submission::build(PersonalDetails::new("Jane", "Acme"), answers, fixed_time());
        assert!(matches!(result, Err(FinscopeError::NoSelection)));
    }
}
