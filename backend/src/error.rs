//! Error types for the FastForm parsing pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`DecodeError`] - Codec-level failures (workbook or delimited text)
//! - [`ParseError`] - Top-level pipeline errors returned to callers
//! - [`RowError`] - Row-scoped failures, absorbed by the aggregator
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. Only [`ParseError`]
//! ever escapes the parser; [`RowError`] is recorded per row and never
//! propagates.

use thiserror::Error;

// =============================================================================
// Decode Errors
// =============================================================================

/// Errors raised while decoding file bytes into rows.
///
/// The underlying codec error is flattened into a message so callers see
/// one failure mode per format instead of library-specific types.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The spreadsheet codec could not read the workbook.
    #[error("Failed to decode spreadsheet: {0}")]
    Spreadsheet(String),

    /// The delimited-text codec could not read the content.
    #[error("Failed to decode delimited text: {0}")]
    Delimited(String),
}

// =============================================================================
// Row Errors (absorbed, never escape)
// =============================================================================

/// A failure scoped to a single data row.
///
/// Produced by the row mapper and partitioned out by the aggregator;
/// the surrounding parse continues with the remaining rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    /// The question column is empty or missing.
    #[error("question title is empty or missing")]
    MissingTitle,
}

// =============================================================================
// Parse Errors (top-level)
// =============================================================================

/// Top-level parsing errors.
///
/// This is the main error type returned by [`crate::parser::parse_file`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file failed preflight format validation.
    ///
    /// The message enumerates every violated rule, not just the first.
    #[error("Invalid file: {}", .errors.join("; "))]
    Preflight { errors: Vec<String> },

    /// Decoding the file bytes failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded table contained no rows at all.
    #[error("File is empty")]
    EmptyFile,

    /// The table contained a header row but no data rows.
    #[error("No question data found in file")]
    NoQuestionData,

    /// Rows were present but none produced a usable question.
    #[error("No valid questions found in file")]
    NoValidQuestions,

    /// The media type matched no known decoder.
    ///
    /// Unreachable after preflight, kept as a defensive branch.
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_origin() {
        let err = DecodeError::Spreadsheet("corrupt zip".into());
        assert!(err.to_string().contains("spreadsheet"));

        let err = DecodeError::Delimited("bad quoting".into());
        assert!(err.to_string().contains("delimited"));
    }

    #[test]
    fn test_error_conversion_chain() {
        // DecodeError -> ParseError
        let decode_err = DecodeError::Spreadsheet("no sheets".into());
        let parse_err: ParseError = decode_err.into();
        assert!(parse_err.to_string().contains("no sheets"));
    }

    #[test]
    fn test_preflight_concatenates_all_errors() {
        let err = ParseError::Preflight {
            errors: vec!["unsupported file type".into(), "file is empty".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("unsupported file type"));
        assert!(msg.contains("file is empty"));
    }

    #[test]
    fn test_structural_errors_are_distinct() {
        assert_ne!(
            ParseError::NoQuestionData.to_string(),
            ParseError::NoValidQuestions.to_string()
        );
    }
}
