//! JSON Schema validation for emitted questions.
//!
//! The parser's output contract toward the form-creation layer is checked
//! against a JSON Schema (Draft 7) embedded at compile time from
//! `schemas/question.json`. This is downstream quality assurance, separate
//! from the preflight file-format check in [`crate::parser`].
//!
//! # Example
//!
//! ```rust,ignore
//! use fastform::validation::validate_question;
//! use serde_json::json;
//!
//! let question = json!({
//!     "id": "q_1700000000000_0",
//!     "type": "short_text",
//!     "title": "¿Cuál es tu nombre?",
//!     "required": true,
//!     "order": 0,
//!     "createdAt": "2026-01-01T00:00:00Z",
//!     "updatedAt": "2026-01-01T00:00:00Z"
//! });
//! assert!(validate_question(&question).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

/// Embedded question schema, parsed once.
static QUESTION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/question.json"))
        .expect("invalid embedded schema")
});

/// Validate a JSON object against a schema.
///
/// Returns every violation, not just the first.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Boolean-only variant of [`validate`].
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate one question against the embedded schema.
pub fn validate_question(data: &Value) -> Result<(), Vec<String>> {
    validate(&QUESTION_SCHEMA, data)
}

/// Quick check against the embedded question schema.
pub fn is_valid_question(data: &Value) -> bool {
    is_valid(&QUESTION_SCHEMA, data)
}
