//! File-to-question parsing pipeline.
//!
//! The public façade over the whole pipeline:
//!
//! ```text
//! UploadedFile → preflight → decode → classify headers → map rows → Question[]
//! ```
//!
//! [`validate_file_format`] runs the preflight check standalone (UI
//! pre-checks); [`parse_file`] runs the full pipeline. Everything else in
//! the submodules is plumbing for these two.

pub mod decode;
pub mod headers;
pub mod mapper;
pub mod rules;
pub mod vocab;

pub use decode::{media_type_for_extension, CellValue, DecodedTable, RawRow, SourceFormat};
pub use headers::{classify, HeaderLayout};
pub use mapper::{map_row, map_rows, parse_required, tokenize_options, MapResult, SkippedRow};
pub use rules::parse_validations;
pub use vocab::{canonical_header, infer_type};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::logs::{log_info, log_success};
use crate::error::{ParseError, ParseResult};
use crate::models::{Question, ValidationResult};

/// Upper bound on accepted file size.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Above this size the file is accepted with a warning.
const LARGE_FILE_BYTES: u64 = 5 * 1024 * 1024;

// =============================================================================
// Input boundary
// =============================================================================

/// A file as seen by the core: declared media type, byte size, content.
///
/// How the file reached the process (HTTP upload, CLI path, drag-and-drop)
/// is not this subsystem's concern.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name, if known.
    pub name: Option<String>,
    /// Declared media type.
    pub media_type: String,
    /// Size in bytes.
    pub size: u64,
    /// File content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Build from in-memory content; `size` is derived from the bytes.
    pub fn new(name: Option<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name,
            media_type: media_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }
}

// =============================================================================
// Preflight format validation
// =============================================================================

/// Check media type and size before any decode attempt.
///
/// Every rule is evaluated; `errors` accumulates all violations rather
/// than stopping at the first. No side effects, no decoding.
pub fn validate_file_format(file: &UploadedFile) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if SourceFormat::from_media_type(&file.media_type).is_none() {
        errors.push(format!("unsupported file type: {}", file.media_type));
    }

    if file.size == 0 {
        errors.push("file is empty".to_string());
    }

    if file.size > MAX_FILE_BYTES {
        errors.push(format!(
            "file exceeds the {} MiB limit",
            MAX_FILE_BYTES / (1024 * 1024)
        ));
    } else if file.size > LARGE_FILE_BYTES {
        warnings.push("large file, parsing may take a while".to_string());
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        row_count: 0,
        column_count: 0,
    }
}

// =============================================================================
// Parse outcome
// =============================================================================

/// Metadata about the decoded source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// Which decoder handled the file.
    pub format: SourceFormat,
    /// Detected text encoding (delimited input only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Detected delimiter (delimited input only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    /// Total decoded rows, header row included.
    pub row_count: usize,
    /// Widest decoded row.
    pub column_count: usize,
    /// Whether row 0 was classified as a header row.
    pub has_headers: bool,
}

/// Everything a parse produced.
///
/// `skipped` lets callers surface the difference between input rows and
/// emitted questions (the UI shows it as a warning badge).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    /// Questions in source order.
    pub questions: Vec<Question>,
    /// Data rows that produced no question.
    pub skipped: Vec<SkippedRow>,
    /// Source table metadata.
    pub info: SourceInfo,
}

// =============================================================================
// Façade
// =============================================================================

/// Parse an uploaded file into form questions.
///
/// Fails fast on preflight violations (all of them concatenated into one
/// message), then decodes, classifies headers, and maps rows. Per-row
/// failures are absorbed; the call only errors when the whole file is
/// unusable.
pub fn parse_file(file: &UploadedFile) -> ParseResult<ParseOutcome> {
    let preflight = validate_file_format(file);
    if !preflight.is_valid {
        return Err(ParseError::Preflight {
            errors: preflight.errors,
        });
    }

    // Unreachable after preflight, kept as a defensive branch.
    let format = SourceFormat::from_media_type(&file.media_type)
        .ok_or_else(|| ParseError::UnsupportedType(file.media_type.clone()))?;

    log_info(format!(
        "Decoding {} ({} bytes)...",
        file.name.as_deref().unwrap_or("upload"),
        file.size
    ));
    let table = decode::decode(format, &file.bytes)?;

    let layout = headers::classify(&table.rows)?;
    log_info(format!(
        "Read {} rows ({})",
        table.rows.len(),
        if layout.has_headers {
            "header row detected"
        } else {
            "no header row"
        }
    ));

    let mapped = map_rows(&table.rows, &layout);
    log_success(mapped.summary());

    if mapped.questions.is_empty() {
        return Err(ParseError::NoValidQuestions);
    }

    let column_count = table.rows.iter().map(|row| row.len()).max().unwrap_or(0);

    Ok(ParseOutcome {
        questions: mapped.questions,
        skipped: mapped.skipped,
        info: SourceInfo {
            format,
            encoding: table.encoding,
            delimiter: table.delimiter,
            row_count: table.rows.len(),
            column_count,
            has_headers: layout.has_headers,
        },
    })
}

/// Read a file from disk and parse it, inferring the media type from the
/// extension. This is the pipeline's only I/O boundary.
pub async fn parse_path(path: impl AsRef<Path>) -> ParseResult<ParseOutcome> {
    let path = path.as_ref();
    let media_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(media_type_for_extension)
        .unwrap_or("application/octet-stream");

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);

    parse_file(&UploadedFile::new(name, media_type, bytes))
}
