//! Domain models for the FastForm parsing pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`Question`] - A typed form question, the principal output entity
//! - [`QuestionType`] - Closed enumeration of supported question types
//! - [`MultipleChoiceConfig`] - Options for choice-bearing questions
//! - [`ValidationRule`] - Structured answer-validation rule
//! - [`ValidationResult`] - Preflight file-format check result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Question Type
// =============================================================================

/// Type of a form question.
///
/// Mirrors the question types the Google Forms mapping layer understands.
/// Unrecognized or absent type text falls back to [`QuestionType::ShortText`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Single-line free text.
    #[default]
    ShortText,
    /// Multi-line free text (paragraph).
    LongText,
    /// Single selection among radio options.
    MultipleChoice,
    /// Multiple selection among checkbox options.
    Checkboxes,
    /// Single selection from a dropdown list.
    Dropdown,
    /// Numeric scale (rating).
    LinearScale,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Email address.
    Email,
    /// Numeric answer.
    Number,
    /// Phone number.
    Phone,
}

impl QuestionType {
    /// Whether this type carries an option list (radio, checkbox, dropdown).
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice | Self::Checkboxes | Self::Dropdown
        )
    }

    /// Canonical snake_case name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortText => "short_text",
            Self::LongText => "long_text",
            Self::MultipleChoice => "multiple_choice",
            Self::Checkboxes => "checkboxes",
            Self::Dropdown => "dropdown",
            Self::LinearScale => "linear_scale",
            Self::Date => "date",
            Self::Time => "time",
            Self::Email => "email",
            Self::Number => "number",
            Self::Phone => "phone",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Multiple Choice Config
// =============================================================================

/// Option list for choice-bearing question types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceConfig {
    /// Tokenized, trimmed, non-empty options in source order.
    pub options: Vec<String>,
    /// Whether an "Other" free-text option is offered.
    #[serde(default)]
    pub allow_other: bool,
}

impl MultipleChoiceConfig {
    /// Config with the given options and no "Other" entry.
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            allow_other: false,
        }
    }
}

// =============================================================================
// Validation Rules
// =============================================================================

/// Kind of answer-validation rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRuleType {
    /// Answer must be a well-formed email address.
    EmailFormat,
    /// Answer must have at least `value` characters.
    MinLength,
    /// Answer must have at most `value` characters.
    MaxLength,
}

/// A structured validation rule extracted from a free-text cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    /// Rule kind.
    #[serde(rename = "type")]
    pub rule_type: ValidationRuleType,
    /// Numeric bound for length rules; absent for format rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    /// Human-readable message shown to respondents.
    pub message: String,
}

// =============================================================================
// Question
// =============================================================================

/// A form question produced by the parsing pipeline.
///
/// Immutable after construction within this subsystem; owned by the caller
/// thereafter. `id` is derived from a coarse timestamp plus the row index:
/// unique within one parse call, NOT globally unique across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, unique within this parse run.
    pub id: String,
    /// Question type.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Question text; never empty.
    pub title: String,
    /// Optional helper text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether an answer is mandatory.
    pub required: bool,
    /// Zero-based position among data rows.
    pub order: usize,
    /// Option list, present only for choice-bearing types with options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_choice_config: Option<MultipleChoiceConfig>,
    /// Answer-validation rules, present iff a validation cell existed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationRule>>,
    /// Construction timestamp (informational only).
    pub created_at: DateTime<Utc>,
    /// Construction timestamp (informational only).
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Create a question with the minimal required fields.
    ///
    /// The remaining optional fields default to absent/false and are set
    /// by the row mapper.
    pub fn new(title: impl Into<String>, question_type: QuestionType, order: usize) -> Self {
        let now = Utc::now();
        Self {
            id: format!("q_{}_{}", now.timestamp_millis(), order),
            question_type,
            title: title.into(),
            description: None,
            required: false,
            order,
            multiple_choice_config: None,
            validation: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Preflight Validation Result
// =============================================================================

/// Result of the preflight file-format check.
///
/// Produced before any decode attempt; `row_count` and `column_count`
/// are always zero here because the check never reads the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// AND of all independent checks.
    pub is_valid: bool,
    /// Every violated rule, not just the first.
    pub errors: Vec<String>,
    /// Non-blocking advisories.
    pub warnings: Vec<String>,
    /// Always zero at preflight.
    pub row_count: usize,
    /// Always zero at preflight.
    pub column_count: usize,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_default() {
        assert_eq!(QuestionType::default(), QuestionType::ShortText);
    }

    #[test]
    fn test_choice_bearing_types() {
        assert!(QuestionType::MultipleChoice.is_choice());
        assert!(QuestionType::Checkboxes.is_choice());
        assert!(QuestionType::Dropdown.is_choice());
        assert!(!QuestionType::ShortText.is_choice());
        assert!(!QuestionType::LinearScale.is_choice());
    }

    #[test]
    fn test_question_type_serializes_snake_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");
        let json = serde_json::to_string(&QuestionType::LinearScale).unwrap();
        assert_eq!(json, "\"linear_scale\"");
    }

    #[test]
    fn test_question_serialization() {
        let mut question = Question::new("¿Cuál es tu nombre?", QuestionType::ShortText, 0);
        question.required = true;

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["title"], "¿Cuál es tu nombre?");
        assert_eq!(json["type"], "short_text");
        assert_eq!(json["required"], true);
        assert_eq!(json["order"], 0);
        // absent optionals are omitted entirely
        assert!(json.get("description").is_none());
        assert!(json.get("multipleChoiceConfig").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_question_id_embeds_order() {
        let question = Question::new("Title", QuestionType::ShortText, 7);
        assert!(question.id.starts_with("q_"));
        assert!(question.id.ends_with("_7"));
    }

    #[test]
    fn test_validation_rule_serialization() {
        let rule = ValidationRule {
            rule_type: ValidationRuleType::MinLength,
            value: Some(5),
            message: "must be at least 5 characters".into(),
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "min_length");
        assert_eq!(json["value"], 5);
    }
}
