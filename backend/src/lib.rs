//! # FastForm - spreadsheet to form questions
//!
//! FastForm's backend turns uploaded tabular files (CSV, XLSX, XLS) into an
//! ordered list of typed form questions ready for the Google Forms mapping
//! layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / XLSX  │────▶│   Decoder   │────▶│  Classifier │────▶│ Question[]  │
//! │  (upload)   │     │ (auto-enc)  │     │  + Mapper   │     │  (ordered)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fastform::{parse_file, UploadedFile};
//!
//! let file = UploadedFile::new(Some("survey.csv".into()), "text/csv", bytes);
//! let outcome = parse_file(&file)?;
//! println!("Parsed {} questions", outcome.questions.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Question, QuestionType, ValidationRule)
//! - [`parser`] - The parsing pipeline and its façade
//! - [`validation`] - Output schema validation
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{DecodeError, DecodeResult, ParseError, ParseResult, RowError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    MultipleChoiceConfig,
    Question,
    QuestionType,
    ValidationResult,
    ValidationRule,
    ValidationRuleType,
};

// =============================================================================
// Re-exports - Parser
// =============================================================================

pub use parser::{
    infer_type,
    media_type_for_extension,
    parse_file,
    parse_path,
    parse_required,
    parse_validations,
    tokenize_options,
    validate_file_format,
    CellValue,
    HeaderLayout,
    ParseOutcome,
    RawRow,
    SkippedRow,
    SourceFormat,
    SourceInfo,
    UploadedFile,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, is_valid_question, validate, validate_question};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ParseResponse, ResponseMetadata, ValidationStats};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
