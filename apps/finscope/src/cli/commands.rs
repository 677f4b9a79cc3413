//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::FinscopeConfig;
use finscope_core::{
    AnswerSet, FinscopeError, STAGE_TABLE, StageDescriptor, descriptor_for, questions, score,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Maximum size of an answer-set file (1 MB).
const MAX_ANSWER_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), FinscopeError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| FinscopeError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(FinscopeError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize a path and ensure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, FinscopeError> {
    let canonical = path.canonicalize().map_err(|e| {
        FinscopeError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(FinscopeError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// ANSWER INPUT
// =============================================================================

/// Parse a `QUESTION=OPTION` argument.
pub fn parse_answer_arg(arg: &str) -> Result<(&str, &str), FinscopeError> {
    match arg.split_once('=') {
        Some((question, option)) if !question.trim().is_empty() => {
            Ok((question.trim(), option.trim()))
        }
        _ => Err(FinscopeError::SerializationError(format!(
            "Expected QUESTION=OPTION, got '{}'",
            arg
        ))),
    }
}

/// Load an answer set from a JSON file.
pub fn load_answers_file(path: &Path) -> Result<AnswerSet, FinscopeError> {
    let validated_path = validate_file_path(path)?;
    validate_file_size(&validated_path, MAX_ANSWER_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| FinscopeError::IoError(format!("Read file: {}", e)))?;
    serde_json::from_slice(&contents)
        .map_err(|e| FinscopeError::SerializationError(format!("Answer file: {}", e)))
}

/// Combine file answers and command-line selections.
///
/// Command-line selections are appended after the file's, in order.
pub fn collect_answers(file: Option<&Path>, args: &[String]) -> Result<AnswerSet, FinscopeError> {
    let mut answers = match file {
        Some(path) => load_answers_file(path)?,
        None => AnswerSet::new(),
    };
    for arg in args {
        let (question, option) = parse_answer_arg(arg)?;
        answers.select(question, option);
    }
    Ok(answers)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: FinscopeConfig) -> Result<(), FinscopeError> {
    println!("Finscope Assessment Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Rate limit: {} req/s", config.security.rate_limit);
    println!(
        "  Admin auth: {}",
        if config.api_key().is_some() { "enabled" } else { "DISABLED" }
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /questions         - The questionnaire");
    println!("  GET  /stages            - Stage descriptors");
    println!("  POST /score             - Score answers");
    println!("  POST /submissions       - Record a submission");
    println!("  POST /reviews           - Record a review");
    println!("  GET  /admin/submissions - List submissions");
    println!("  GET  /admin/export      - Download export");
    println!("  GET  /health            - Health check");
    println!();
    println!("Submissions are kept in memory only.");
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config).await
}

// =============================================================================
// SCORE COMMAND
// =============================================================================

/// Score an answer set and print the stage.
pub fn cmd_score(
    json_mode: bool,
    verbose: bool,
    file: Option<&Path>,
    args: &[String],
) -> Result<(), FinscopeError> {
    let answers = collect_answers(file, args)?;
    tracing::debug!("Scoring {} selections", answers.selection_count());

    let report = score(&answers);
    let descriptor = report.stage.descriptor();

    if json_mode {
        let output = serde_json::json!({
            "stage": report.stage.number(),
            "title": descriptor.title,
            "subtitle": descriptor.subtitle,
            "problems": descriptor.problems,
            "solutions": descriptor.solutions,
            "report": report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Finscope Assessment Result");
    println!("==========================");
    println!();
    print_descriptor(descriptor);

    if verbose {
        println!();
        println!("Scoring trace:");
        println!("  Rule:     {}", report.resolution.rule());
        println!("  Values:   {:?}", report.values);
        println!("  Skipped:  {}", report.skipped);
        println!("  Raw:      {}", report.raw);
        for (value, count) in report.frequencies.iter() {
            println!("  Count[{}]: {}", value, count);
        }
        if report.fell_back() {
            println!("  Raw value out of range, fell back to stage 1");
        }
    }

    Ok(())
}

// =============================================================================
// STAGES COMMAND
// =============================================================================

/// Show the stage table, or a single stage.
pub fn cmd_stages(json_mode: bool, stage: Option<i64>) -> Result<(), FinscopeError> {
    let descriptors: Vec<&StageDescriptor> = match stage {
        Some(n) => vec![descriptor_for(n)],
        None => STAGE_TABLE.iter().collect(),
    };

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&descriptors).unwrap_or_default()
        );
        return Ok(());
    }

    for (i, descriptor) in descriptors.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_descriptor(descriptor);
    }
    Ok(())
}

fn print_descriptor(descriptor: &StageDescriptor) {
    println!("{}: {}", descriptor.title, descriptor.subtitle);
    println!("{}", "-".repeat(descriptor.title.len() + descriptor.subtitle.len() + 2));
    println!("{}", descriptor.description);
    println!();
    for (problem, solution) in descriptor.pairs() {
        println!("  Problem:  {}", problem);
        println!("  Solution: {}", solution);
    }
    println!();
    println!("{}", descriptor.call_to_action.heading);
    println!("{}", descriptor.callout());
}

// =============================================================================
// QUESTIONS COMMAND
// =============================================================================

/// Show the questionnaire.
pub fn cmd_questions(json_mode: bool) -> Result<(), FinscopeError> {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(questions()).unwrap_or_default()
        );
        return Ok(());
    }

    for question in questions() {
        println!("[{}] {}", question.id, question.text);
        println!("    {}", question.description);
        for option in question.options {
            println!("    {}) {}", option.id, option.text);
        }
        println!();
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_answer_arg_splits_on_first_equals() {
        assert_eq!(
            parse_answer_arg("excel-chaos=3").expect("parse"),
            ("excel-chaos", "3")
        );
        assert_eq!(parse_answer_arg("q= a=b ").expect("parse"), ("q", "a=b"));
    }

    #[test]
    fn parse_answer_arg_rejects_malformed() {
        assert!(parse_answer_arg("excel-chaos").is_err());
        assert!(parse_answer_arg("=3").is_err());
    }

    #[test]
    fn collect_answers_appends_args_after_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"excel-chaos":["3"]}}"#).expect("write");

        let answers = collect_answers(
            Some(file.path()),
            &["erp-reality=2".to_string(), "excel-chaos=4".to_string()],
        )
        .expect("collect");

        assert_eq!(answers.selection_count(), 3);
        let excel: Vec<_> = answers
            .get("excel-chaos")
            .expect("answered")
            .iter()
            .map(|o| o.as_str())
            .collect();
        assert_eq!(excel, vec!["3", "4"]);
    }

    #[test]
    fn load_answers_rejects_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            load_answers_file(dir.path()),
            Err(FinscopeError::IoError(_))
        ));
    }

    #[test]
    fn load_answers_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "not json").expect("write");
        assert!(matches!(
            load_answers_file(file.path()),
            Err(FinscopeError::SerializationError(_))
        ));
    }

    #[test]
    fn stages_command_accepts_out_of_range() {
        assert!(cmd_stages(true, Some(42)).is_ok());
    }
}
