//! Header-row detection and canonical field naming.
//!
//! Decides whether row 0 is a header row by matching its cells against the
//! bilingual header vocabulary, then aligns every column with a canonical
//! field name.

use crate::error::{ParseError, ParseResult};

use super::decode::RawRow;
use super::vocab::{self, DEFAULT_HEADERS};

/// Result of classifying the first row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    /// Whether row 0 was recognized as a header row.
    pub has_headers: bool,
    /// Index of the first data row (1 when headers were detected).
    pub start_row: usize,
    /// Canonical field name per column; empty string for blank header
    /// cells, lowercased pass-through for unrecognized labels.
    pub headers: Vec<String>,
}

/// Classify the first row and derive the column layout.
///
/// Detection fires when ANY cell of row 0 exactly matches a recognized
/// header token (case-insensitive, trimmed). A data row that happens to
/// contain a literal token like "type" is therefore misclassified as a
/// header row; this quirk is intentional and pending product review, do
/// not tighten it here.
pub fn classify(rows: &[RawRow]) -> ParseResult<HeaderLayout> {
    if rows.is_empty() {
        return Err(ParseError::EmptyFile);
    }

    let first = &rows[0];
    let has_headers = first.iter().any(|cell| {
        cell.as_text()
            .map(|text| vocab::canonical_header(&text).is_some())
            .unwrap_or(false)
    });

    let (start_row, headers) = if has_headers {
        let headers = first
            .iter()
            .map(|cell| match cell.as_text() {
                Some(text) => vocab::canonical_header(&text)
                    .map(str::to_string)
                    .unwrap_or_else(|| text.to_lowercase()),
                None => String::new(),
            })
            .collect();
        (1, headers)
    } else {
        (0, DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect())
    };

    if rows.len() <= start_row {
        return Err(ParseError::NoQuestionData);
    }

    Ok(HeaderLayout {
        has_headers,
        start_row,
        headers,
    })
}
