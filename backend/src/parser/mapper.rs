//! Row-to-question mapping and per-row error recovery.
//!
//! [`map_row`] turns one data row into a [`Question`] or a [`RowError`];
//! [`map_rows`] drives it over the whole table, partitioning results into
//! questions and skipped rows instead of aborting. A failed row is logged
//! with its 1-based source line and dropped; parsing always continues.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::logs::log_warning;
use crate::error::RowError;
use crate::models::{MultipleChoiceConfig, Question};

use super::decode::{is_blank_row, CellValue, RawRow};
use super::headers::HeaderLayout;
use super::rules::parse_validations;
use super::vocab::{
    self, FIELD_DESCRIPTION, FIELD_OPTIONS, FIELD_QUESTION, FIELD_REQUIRED, FIELD_TYPE,
    FIELD_VALIDATION,
};

/// Any of `, ; |` or a newline separates options inside one cell.
static OPTION_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;|\n]").expect("valid regex"));

// =============================================================================
// Aggregation result
// =============================================================================

/// A data row that failed mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    /// 1-based line number in the source table (header row included).
    pub line: usize,
    /// Why the row produced no question.
    pub reason: String,
}

/// Result of mapping all data rows.
#[derive(Debug, Default)]
pub struct MapResult {
    /// Successfully mapped questions, in source order.
    pub questions: Vec<Question>,
    /// Rows that failed mapping.
    pub skipped: Vec<SkippedRow>,
}

impl MapResult {
    /// Summary line for progress logging.
    pub fn summary(&self) -> String {
        format!(
            "Mapped {} questions, {} rows skipped",
            self.questions.len(),
            self.skipped.len()
        )
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Map every data row of the table, recovering from per-row failures.
///
/// Entirely blank rows are skipped silently (they still consume an order
/// position). Rows that fail mapping are logged as warnings and recorded
/// in `skipped`; they are never retried and never abort the loop.
pub fn map_rows(rows: &[RawRow], layout: &HeaderLayout) -> MapResult {
    let mut result = MapResult::default();

    let data_rows = rows.get(layout.start_row..).unwrap_or(&[]);
    for (order, row) in data_rows.iter().enumerate() {
        let line = layout.start_row + order + 1;

        if is_blank_row(row) {
            continue;
        }

        match map_row(row, &layout.headers, order) {
            Ok(question) => result.questions.push(question),
            Err(err) => {
                log_warning(format!("Row {line}: {err}, row skipped"));
                result.skipped.push(SkippedRow {
                    line,
                    reason: err.to_string(),
                });
            }
        }
    }

    result
}

// =============================================================================
// Row mapper
// =============================================================================

/// Map a single data row into a question.
///
/// `order` is the zero-based position of the row among data rows; it
/// determines both `Question::order` and the id suffix.
pub fn map_row(row: &RawRow, headers: &[String], order: usize) -> Result<Question, RowError> {
    let fields = field_map(row, headers);

    let title = fields
        .get(FIELD_QUESTION)
        .and_then(|cell| cell.as_text())
        .ok_or(RowError::MissingTitle)?;

    let question_type = fields
        .get(FIELD_TYPE)
        .and_then(|cell| cell.as_text())
        .map(|text| vocab::infer_type(&text))
        .unwrap_or_default();

    let mut question = Question::new(title, question_type, order);

    // Options only make sense on choice-bearing types. A choice type
    // without options is permitted here; rejecting it is the form-creation
    // service's call.
    if question_type.is_choice() {
        if let Some(text) = fields.get(FIELD_OPTIONS).and_then(|cell| cell.as_text()) {
            let options = tokenize_options(&text);
            if !options.is_empty() {
                question.multiple_choice_config = Some(MultipleChoiceConfig::new(options));
            }
        }
    }

    question.required = fields
        .get(FIELD_REQUIRED)
        .map(|cell| parse_required(cell))
        .unwrap_or(false);

    question.description = fields
        .get(FIELD_DESCRIPTION)
        .and_then(|cell| cell.as_text());

    question.validation = fields
        .get(FIELD_VALIDATION)
        .and_then(|cell| cell.as_text())
        .map(|text| parse_validations(&text));

    Ok(question)
}

/// Zip headers with cells by position.
///
/// Blank header names are ignored, as are cells beyond the header length.
/// On duplicate headers the rightmost column wins.
fn field_map<'a>(row: &'a RawRow, headers: &'a [String]) -> HashMap<&'a str, &'a CellValue> {
    let mut fields = HashMap::new();
    for (header, cell) in headers.iter().zip(row) {
        if header.is_empty() {
            continue;
        }
        fields.insert(header.as_str(), cell);
    }
    fields
}

/// Split an options cell on `, ; |` or newlines, dropping empty tokens.
pub fn tokenize_options(text: &str) -> Vec<String> {
    OPTION_SEPARATORS
        .split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tolerant required-flag parsing.
///
/// Booleans pass through; numbers are true iff exactly 1; strings are
/// matched against the bilingual truthy tokens; anything else is false.
pub fn parse_required(cell: &CellValue) -> bool {
    match cell {
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n == 1.0,
        CellValue::Text(s) => vocab::is_truthy_token(s),
        CellValue::Empty => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn test_map_row_minimal() {
        let row = vec![text("¿Cuál es tu nombre?")];
        let question = map_row(&row, &headers(&["question"]), 0).unwrap();

        assert_eq!(question.title, "¿Cuál es tu nombre?");
        assert_eq!(question.question_type, QuestionType::ShortText);
        assert!(!question.required);
        assert!(question.multiple_choice_config.is_none());
        assert!(question.validation.is_none());
    }

    #[test]
    fn test_map_row_full() {
        let row = vec![
            text("  Color favorito  "),
            text("opcion_multiple"),
            text("Rojo, Verde, Azul"),
            text("sí"),
            text("Elige uno"),
        ];
        let question = map_row(
            &row,
            &headers(&["question", "type", "options", "required", "description"]),
            3,
        )
        .unwrap();

        assert_eq!(question.title, "Color favorito");
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert!(question.required);
        assert_eq!(question.order, 3);
        assert_eq!(question.description.as_deref(), Some("Elige uno"));
        let config = question.multiple_choice_config.unwrap();
        assert_eq!(config.options, vec!["Rojo", "Verde", "Azul"]);
        assert!(!config.allow_other);
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let row = vec![CellValue::Empty, text("texto_corto")];
        let err = map_row(&row, &headers(&["question", "type"]), 0).unwrap_err();
        assert_eq!(err, RowError::MissingTitle);

        let row = vec![text("   "), text("texto_corto")];
        assert!(map_row(&row, &headers(&["question", "type"]), 0).is_err());
    }

    #[test]
    fn test_numeric_title_cell() {
        let row = vec![CellValue::Number(2024.0)];
        let question = map_row(&row, &headers(&["question"]), 0).unwrap();
        assert_eq!(question.title, "2024");
    }

    #[test]
    fn test_options_tokenizer_accepts_all_separators() {
        assert_eq!(
            tokenize_options("Rojo,Verde;Azul|Amarillo\nNaranja"),
            vec!["Rojo", "Verde", "Azul", "Amarillo", "Naranja"]
        );
        // empty tokens are dropped
        assert_eq!(tokenize_options("a,,b, ,c"), vec!["a", "b", "c"]);
        assert!(tokenize_options("  ").is_empty());
    }

    #[test]
    fn test_choice_type_without_options_is_permitted() {
        let row = vec![text("Pick one"), text("dropdown")];
        let question = map_row(&row, &headers(&["question", "type"]), 0).unwrap();
        assert_eq!(question.question_type, QuestionType::Dropdown);
        assert!(question.multiple_choice_config.is_none());
    }

    #[test]
    fn test_options_ignored_for_non_choice_types() {
        let row = vec![text("Edad"), text("numero"), text("1,2,3")];
        let question = map_row(&row, &headers(&["question", "type", "options"]), 0).unwrap();
        assert!(question.multiple_choice_config.is_none());
    }

    #[test]
    fn test_required_parsing_boundary() {
        assert!(parse_required(&text("Sí")));
        assert!(parse_required(&text("true")));
        assert!(parse_required(&CellValue::Number(1.0)));
        assert!(parse_required(&CellValue::Bool(true)));

        assert!(!parse_required(&text("no")));
        assert!(!parse_required(&CellValue::Number(0.0)));
        assert!(!parse_required(&CellValue::Number(2.0)));
        assert!(!parse_required(&CellValue::Empty));
        assert!(!parse_required(&CellValue::Bool(false)));
    }

    #[test]
    fn test_validation_cell_presence() {
        let cols = headers(&["question", "validation"]);

        let row = vec![text("Correo"), text("email, min:5")];
        let question = map_row(&row, &cols, 0).unwrap();
        assert_eq!(question.validation.as_ref().unwrap().len(), 2);

        // cell present but unrecognized: present-and-empty list
        let row = vec![text("Correo"), text("whatever")];
        let question = map_row(&row, &cols, 0).unwrap();
        assert_eq!(question.validation.as_deref(), Some(&[][..]));

        // cell blank: absent
        let row = vec![text("Correo"), CellValue::Empty];
        let question = map_row(&row, &cols, 0).unwrap();
        assert!(question.validation.is_none());
    }

    #[test]
    fn test_extra_cells_beyond_headers_ignored() {
        let row = vec![text("Q"), text("texto_corto"), text("stray")];
        let question = map_row(&row, &headers(&["question", "type"]), 0).unwrap();
        assert_eq!(question.title, "Q");
    }

    #[test]
    fn test_map_rows_partitions_and_numbers_lines() {
        let layout = HeaderLayout {
            has_headers: true,
            start_row: 1,
            headers: headers(&["question", "type"]),
        };
        let rows = vec![
            vec![text("Pregunta"), text("Tipo")],
            vec![text("Uno"), text("texto_corto")],
            vec![CellValue::Empty, text("texto_corto")], // line 3: missing title
            vec![text("Dos"), CellValue::Empty],
        ];

        let result = map_rows(&rows, &layout);

        assert_eq!(result.questions.len(), 2);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].line, 3);
        assert_eq!(result.questions[0].order, 0);
        // the failed row consumed order 1
        assert_eq!(result.questions[1].order, 2);
    }

    #[test]
    fn test_map_rows_skips_blank_rows_silently() {
        let layout = HeaderLayout {
            has_headers: false,
            start_row: 0,
            headers: headers(&["question", "type"]),
        };
        let rows = vec![
            vec![text("Uno"), CellValue::Empty],
            vec![CellValue::Empty, CellValue::Empty],
            vec![text("Dos"), CellValue::Empty],
        ];

        let result = map_rows(&rows, &layout);

        assert_eq!(result.questions.len(), 2);
        assert!(result.skipped.is_empty());
        // blank row consumed an order slot
        assert_eq!(result.questions[1].order, 2);
    }
}
