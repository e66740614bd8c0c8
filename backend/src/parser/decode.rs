//! Tabular decoders: file bytes to rows of raw cells.
//!
//! Two decoders share one narrow contract (`bytes -> Vec<RawRow>`), selected
//! by [`SourceFormat`]:
//!
//! - Spreadsheet: first worksheet of an XLSX/XLS workbook, raw cell types
//!   preserved (numbers and booleans are not stringified here).
//! - Delimited: CSV text with encoding and delimiter auto-detection.
//!
//! Neither decoder treats the first row specially; header detection is a
//! later concern. Codec failures are wrapped into [`DecodeError`] naming
//! the origin.

use calamine::{Data, Reader};
use std::io::Cursor;

use crate::error::{DecodeError, DecodeResult};

// =============================================================================
// Source format
// =============================================================================

/// Input format, keyed on the declared media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Binary workbook (XLSX or legacy XLS).
    Spreadsheet,
    /// Delimited text (CSV and variants).
    Delimited,
}

impl SourceFormat {
    /// Resolve a declared media type to a decoder, ignoring parameters
    /// such as `; charset=utf-8`.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match essence.as_str() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel" => Some(Self::Spreadsheet),
            "text/csv" | "application/csv" | "text/comma-separated-values" => {
                Some(Self::Delimited)
            }
            _ => None,
        }
    }
}

/// Canonical media type for a file extension, for callers that only have
/// a path (CLI).
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "xls" => Some("application/vnd.ms-excel"),
        "csv" => Some("text/csv"),
        _ => None,
    }
}

// =============================================================================
// Cells and rows
// =============================================================================

/// A raw cell value as produced by a decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Textual cell, untrimmed.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Blank cell.
    Empty,
}

/// One row of the source table, positional only.
pub type RawRow = Vec<CellValue>;

impl CellValue {
    /// Whether the cell is blank (empty, or whitespace-only text).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed display text, or `None` for blank cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Number(n) => Some(format_number(*n)),
            Self::Bool(b) => Some(b.to_string()),
            Self::Empty => None,
        }
    }
}

/// Whether every cell in the row is blank.
pub fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

/// Integral numbers render without a trailing `.0` so a numeric `2` cell
/// reads as `"2"` when used as text.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// =============================================================================
// Decoded table
// =============================================================================

/// Decoder output: rows plus detection metadata.
#[derive(Debug, Clone)]
pub struct DecodedTable {
    /// Rectangular row data in source order.
    pub rows: Vec<RawRow>,
    /// Detected text encoding (delimited input only).
    pub encoding: Option<String>,
    /// Detected delimiter (delimited input only).
    pub delimiter: Option<char>,
}

/// Decode file bytes with the decoder for the given format.
pub fn decode(format: SourceFormat, bytes: &[u8]) -> DecodeResult<DecodedTable> {
    match format {
        SourceFormat::Spreadsheet => decode_workbook(bytes),
        SourceFormat::Delimited => decode_delimited(bytes),
    }
}

// =============================================================================
// Spreadsheet decoder
// =============================================================================

fn decode_workbook(bytes: &[u8]) -> DecodeResult<DecodedTable> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| DecodeError::Spreadsheet(e.to_string()))?;

    // First sheet only; multi-sheet workbooks are not supported.
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DecodeError::Spreadsheet("workbook has no sheets".into()))?
        .map_err(|e| DecodeError::Spreadsheet(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_from_sheet).collect())
        .collect();

    Ok(DecodedTable {
        rows,
        encoding: None,
        delimiter: None,
    })
}

fn cell_from_sheet(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// =============================================================================
// Delimited-text decoder
// =============================================================================

fn decode_delimited(bytes: &[u8]) -> DecodeResult<DecodedTable> {
    let (content, encoding) = decode_text(bytes);
    let delimiter = detect_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DecodeError::Delimited(e.to_string()))?;

        // Fully empty physical lines carry no information.
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(DecodedTable {
        rows,
        encoding: Some(encoding),
        delimiter: Some(delimiter),
    })
}

/// Decode raw bytes to UTF-8 text, auto-detecting the source encoding.
///
/// Spreadsheet exports are frequently ISO-8859-1 or Windows-1252; falls
/// back to UTF-8 when detection is inconclusive.
fn decode_text(bytes: &[u8]) -> (String, String) {
    let (charset, _, _) = chardet::detect(bytes);
    let encoding = encoding_rs::Encoding::for_label(chardet::charset2encoding(&charset).as_bytes())
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    (text.into_owned(), encoding.name().to_lowercase())
}

/// Detect the delimiter by counting candidates in the first line.
fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;
    for sep in [',', ';', '\t', '|'] {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_from_media_type() {
        assert_eq!(
            SourceFormat::from_media_type("text/csv"),
            Some(SourceFormat::Delimited)
        );
        assert_eq!(
            SourceFormat::from_media_type("text/csv; charset=utf-8"),
            Some(SourceFormat::Delimited)
        );
        assert_eq!(
            SourceFormat::from_media_type(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            Some(SourceFormat::Spreadsheet)
        );
        assert_eq!(
            SourceFormat::from_media_type("application/vnd.ms-excel"),
            Some(SourceFormat::Spreadsheet)
        );
        assert_eq!(SourceFormat::from_media_type("application/pdf"), None);
    }

    #[test]
    fn test_media_type_for_extension() {
        assert_eq!(media_type_for_extension("csv"), Some("text/csv"));
        assert!(media_type_for_extension("XLSX").is_some());
        assert_eq!(media_type_for_extension("pdf"), None);
    }

    #[test]
    fn test_decode_simple_csv() {
        let csv = "¿Cómo te llamas?,texto_corto\n¿Tu edad?,numero";
        let table = decode(SourceFormat::Delimited, csv.as_bytes()).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.delimiter, Some(','));
        assert_eq!(
            table.rows[0][0],
            CellValue::Text("¿Cómo te llamas?".into())
        );
        assert_eq!(table.rows[1][1], CellValue::Text("numero".into()));
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let csv = "a,b\n\n ,  \nc,d\n";
        let table = decode(SourceFormat::Delimited, csv.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_blank_fields_become_empty_cells() {
        let csv = "a,,c\n";
        let table = decode(SourceFormat::Delimited, csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0][1], CellValue::Empty);
    }

    #[test]
    fn test_detect_delimiter_variants() {
        assert_eq!(detect_delimiter("a,b,c"), ',');
        assert_eq!(detect_delimiter("a;b;c"), ';');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        // single column: default
        assert_eq!(detect_delimiter("question"), ',');
    }

    #[test]
    fn test_semicolon_csv() {
        let csv = "Pregunta;Tipo\n¿Nombre?;texto_corto";
        let table = decode(SourceFormat::Delimited, csv.as_bytes()).unwrap();
        assert_eq!(table.delimiter, Some(';'));
        assert_eq!(table.rows[1][0], CellValue::Text("¿Nombre?".into()));
    }

    #[test]
    fn test_latin1_decoding() {
        // "¿Qué?,sí" in ISO-8859-1
        let bytes: &[u8] = &[0xBF, 0x51, 0x75, 0xE9, 0x3F, 0x2C, 0x73, 0xED];
        let table = decode(SourceFormat::Delimited, bytes).unwrap();
        // ASCII survives whatever single-byte encoding was detected
        let text = table.rows[0][0].as_text().unwrap();
        assert!(text.contains("Qu"));
    }

    #[test]
    fn test_invalid_workbook_names_origin() {
        let err = decode(SourceFormat::Spreadsheet, b"definitely not a zip").unwrap_err();
        assert!(err.to_string().contains("spreadsheet"));
    }

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(CellValue::Number(2.0).as_text().unwrap(), "2");
        assert_eq!(CellValue::Number(2.5).as_text().unwrap(), "2.5");
        assert_eq!(CellValue::Bool(true).as_text().unwrap(), "true");
        assert_eq!(CellValue::Text("  hi  ".into()).as_text().unwrap(), "hi");
        assert!(CellValue::Empty.as_text().is_none());
        assert!(CellValue::Text("   ".into()).as_text().is_none());
    }

    #[test]
    fn test_blank_row_detection() {
        assert!(is_blank_row(&[
            CellValue::Empty,
            CellValue::Text("  ".into())
        ]));
        assert!(!is_blank_row(&[CellValue::Empty, CellValue::Bool(false)]));
    }
}
