//! REST API types for frontend integration.
//!
//! The upload endpoint returns parsed questions directly in the shape the
//! form builder consumes, together with source metadata, skipped-row
//! details (the UI renders the count discrepancy as a warning badge), and
//! schema-validation stats.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::Question;
use crate::parser::{ParseOutcome, SkippedRow, SourceInfo};
use crate::validation::validate_question;

/// Response sent to the frontend after a file upload was parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    /// Unique job identifier.
    pub job_id: String,

    /// "ready" when every row parsed and validated; "warning" otherwise.
    pub status: String,

    /// Questions in source order, ready for the form builder.
    pub questions: Vec<Question>,

    /// Metadata about the parse.
    pub metadata: ResponseMetadata,
}

/// Metadata about the parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Original file name, if the client sent one.
    pub file_name: Option<String>,

    /// Number of questions returned.
    pub total_questions: usize,

    /// Data rows that produced no question.
    pub skipped_rows: Vec<SkippedRow>,

    /// Source table info (format, encoding, delimiter, counts).
    pub source: SourceInfo,

    /// Output schema validation stats.
    pub validation: ValidationStats,
}

/// Schema-validation statistics over the emitted questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<QuestionErrors>,
}

/// Validation errors for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionErrors {
    pub question_index: usize,
    pub errors: Vec<String>,
}

impl ParseResponse {
    /// Build the response from a parse outcome.
    pub fn from_outcome(outcome: ParseOutcome, file_name: Option<String>) -> Self {
        let validation = validate_questions(&outcome.questions);
        let status = if outcome.skipped.is_empty() && validation.invalid == 0 {
            "ready"
        } else {
            "warning"
        };

        ParseResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            metadata: ResponseMetadata {
                file_name,
                total_questions: outcome.questions.len(),
                skipped_rows: outcome.skipped,
                source: outcome.info,
                validation,
            },
            questions: outcome.questions,
        }
    }
}

/// Validate every question against the embedded schema.
///
/// Detailed errors are capped at the first ten invalid questions.
fn validate_questions(questions: &[Question]) -> ValidationStats {
    let mut valid = 0;
    let mut invalid = 0;
    let mut errors = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        let value = match serde_json::to_value(question) {
            Ok(value) => value,
            Err(e) => {
                invalid += 1;
                errors.push(QuestionErrors {
                    question_index: index,
                    errors: vec![e.to_string()],
                });
                continue;
            }
        };

        match validate_question(&value) {
            Ok(()) => valid += 1,
            Err(errs) => {
                invalid += 1;
                if errors.len() < 10 {
                    errors.push(QuestionErrors {
                        question_index: index,
                        errors: errs,
                    });
                }
            }
        }
    }

    ValidationStats {
        valid,
        invalid,
        errors,
    }
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "questions": [],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;
    use crate::parser::SourceFormat;

    fn outcome(questions: Vec<Question>, skipped: Vec<SkippedRow>) -> ParseOutcome {
        let row_count = questions.len() + skipped.len();
        ParseOutcome {
            questions,
            skipped,
            info: SourceInfo {
                format: SourceFormat::Delimited,
                encoding: Some("utf-8".into()),
                delimiter: Some(','),
                row_count,
                column_count: 2,
                has_headers: false,
            },
        }
    }

    #[test]
    fn test_clean_parse_is_ready() {
        let questions = vec![Question::new("Q", QuestionType::ShortText, 0)];
        let response = ParseResponse::from_outcome(outcome(questions, vec![]), None);

        assert_eq!(response.status, "ready");
        assert_eq!(response.metadata.total_questions, 1);
        assert_eq!(response.metadata.validation.valid, 1);
        assert_eq!(response.metadata.validation.invalid, 0);
        assert!(!response.job_id.is_empty());
    }

    #[test]
    fn test_skipped_rows_downgrade_status() {
        let questions = vec![Question::new("Q", QuestionType::ShortText, 0)];
        let skipped = vec![SkippedRow {
            line: 2,
            reason: "question title is empty or missing".into(),
        }];
        let response =
            ParseResponse::from_outcome(outcome(questions, skipped), Some("input.csv".into()));

        assert_eq!(response.status, "warning");
        assert_eq!(response.metadata.skipped_rows.len(), 1);
        assert_eq!(response.metadata.file_name.as_deref(), Some("input.csv"));
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("No valid questions found in file");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "No valid questions found in file");
        assert!(body["questions"].as_array().unwrap().is_empty());
    }
}
