//! Bilingual (Spanish/English) vocabulary tables for header and type
//! recognition.
//!
//! All tables are immutable process-wide state, built once on first use and
//! queried by case-normalized key. Keeping them in one place avoids
//! scattering the same Spanish/English pairs across the classifier and the
//! mapper.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::models::QuestionType;

// =============================================================================
// Canonical field names
// =============================================================================

pub const FIELD_QUESTION: &str = "question";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_OPTIONS: &str = "options";
pub const FIELD_REQUIRED: &str = "required";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_VALIDATION: &str = "validation";

/// Header order assumed when the first row is not a header row.
///
/// The validation column is absent in this mode; it is only reachable
/// through an explicit header.
pub const DEFAULT_HEADERS: [&str; 5] = [
    FIELD_QUESTION,
    FIELD_TYPE,
    FIELD_OPTIONS,
    FIELD_REQUIRED,
    FIELD_DESCRIPTION,
];

// =============================================================================
// Header synonyms
// =============================================================================

/// Header label -> canonical field name, both languages in one table.
static HEADER_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let entries: [(&str, &[&str]); 6] = [
        (
            FIELD_QUESTION,
            &["pregunta", "question", "titulo", "título", "title"],
        ),
        (FIELD_TYPE, &["tipo", "type", "kind", "tipo_de_pregunta"]),
        (
            FIELD_OPTIONS,
            &["opciones", "options", "choices", "alternativas", "respuestas"],
        ),
        (
            FIELD_REQUIRED,
            &["requerido", "required", "obligatorio", "obligatoria", "mandatory"],
        ),
        (
            FIELD_DESCRIPTION,
            &["descripcion", "descripción", "description", "detalle", "ayuda"],
        ),
        (
            FIELD_VALIDATION,
            &["validacion", "validación", "validation", "reglas", "rules"],
        ),
    ];

    let mut map = HashMap::new();
    for (canonical, labels) in entries {
        for label in labels {
            map.insert(*label, canonical);
        }
    }
    map
});

/// Map a raw header cell to its canonical field name, if recognized.
///
/// Matching is exact on the trimmed, lowercased label.
pub fn canonical_header(label: &str) -> Option<&'static str> {
    HEADER_SYNONYMS
        .get(label.trim().to_lowercase().as_str())
        .copied()
}

// =============================================================================
// Question type synonyms
// =============================================================================

/// Type token -> question type. One table, both languages, queried once
/// per row by the mapper.
static TYPE_SYNONYMS: Lazy<HashMap<&'static str, QuestionType>> = Lazy::new(|| {
    let entries: [(QuestionType, &[&str]); 11] = [
        (
            QuestionType::ShortText,
            &["short_text", "texto_corto", "short", "text", "texto", "respuesta_corta"],
        ),
        (
            QuestionType::LongText,
            &[
                "long_text",
                "texto_largo",
                "textarea",
                "parrafo",
                "párrafo",
                "paragraph",
                "respuesta_larga",
            ],
        ),
        (
            QuestionType::MultipleChoice,
            &[
                "multiple_choice",
                "opcion_multiple",
                "opción_múltiple",
                "radio",
                "choice",
                "multiple",
            ],
        ),
        (
            QuestionType::Checkboxes,
            &["checkboxes", "checkbox", "casillas", "casilla", "multi_select"],
        ),
        (
            QuestionType::Dropdown,
            &["dropdown", "select", "lista", "desplegable", "menu"],
        ),
        (
            QuestionType::LinearScale,
            &[
                "linear_scale",
                "escala",
                "escala_lineal",
                "scale",
                "rating",
                "calificacion",
                "calificación",
            ],
        ),
        (QuestionType::Date, &["date", "fecha"]),
        (QuestionType::Time, &["time", "hora"]),
        (
            QuestionType::Email,
            &["email", "correo", "correo_electronico", "e-mail"],
        ),
        (
            QuestionType::Number,
            &["number", "numero", "número", "numeric", "numerico"],
        ),
        (
            QuestionType::Phone,
            &["phone", "telefono", "teléfono", "tel", "celular"],
        ),
    ];

    let mut map = HashMap::new();
    for (question_type, tokens) in entries {
        for token in tokens {
            map.insert(*token, question_type);
        }
    }
    map
});

/// Infer a question type from free text.
///
/// Case-insensitive, tolerant of both languages simultaneously; empty or
/// unrecognized text falls back to [`QuestionType::ShortText`].
pub fn infer_type(text: &str) -> QuestionType {
    TYPE_SYNONYMS
        .get(text.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or_default()
}

// =============================================================================
// Required-flag tokens
// =============================================================================

/// Tokens treated as "yes" when parsing the required column.
static TRUTHY_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["true", "sí", "si", "yes", "1", "requerido", "obligatorio"]
        .into_iter()
        .collect()
});

/// Whether a string cell marks the question as required.
pub fn is_truthy_token(text: &str) -> bool {
    TRUTHY_TOKENS.contains(text.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_synonyms_both_languages() {
        assert_eq!(canonical_header("Pregunta"), Some(FIELD_QUESTION));
        assert_eq!(canonical_header("question"), Some(FIELD_QUESTION));
        assert_eq!(canonical_header("  TIPO  "), Some(FIELD_TYPE));
        assert_eq!(canonical_header("Opciones"), Some(FIELD_OPTIONS));
        assert_eq!(canonical_header("Requerido"), Some(FIELD_REQUIRED));
        assert_eq!(canonical_header("Descripción"), Some(FIELD_DESCRIPTION));
        assert_eq!(canonical_header("validacion"), Some(FIELD_VALIDATION));
        assert_eq!(canonical_header("¿Cuál es tu nombre?"), None);
    }

    #[test]
    fn test_infer_type_synonyms() {
        for token in ["multiple_choice", "opcion_multiple", "radio", "choice"] {
            assert_eq!(infer_type(token), QuestionType::MultipleChoice, "{token}");
        }
        for token in ["textarea", "parrafo", "paragraph"] {
            assert_eq!(infer_type(token), QuestionType::LongText, "{token}");
        }
        for token in ["select", "lista", "desplegable"] {
            assert_eq!(infer_type(token), QuestionType::Dropdown, "{token}");
        }
        for token in ["rating", "calificacion"] {
            assert_eq!(infer_type(token), QuestionType::LinearScale, "{token}");
        }
        assert_eq!(infer_type("correo"), QuestionType::Email);
        assert_eq!(infer_type("telefono"), QuestionType::Phone);
    }

    #[test]
    fn test_infer_type_is_case_insensitive() {
        assert_eq!(infer_type("  RADIO "), QuestionType::MultipleChoice);
        assert_eq!(infer_type("Fecha"), QuestionType::Date);
    }

    #[test]
    fn test_infer_type_falls_back_to_short_text() {
        assert_eq!(infer_type("xyz"), QuestionType::ShortText);
        assert_eq!(infer_type(""), QuestionType::ShortText);
    }

    #[test]
    fn test_truthy_tokens() {
        for token in ["true", "Sí", "si", "YES", "1", "requerido", "Obligatorio"] {
            assert!(is_truthy_token(token), "{token}");
        }
        for token in ["no", "false", "0", "", "maybe"] {
            assert!(!is_truthy_token(token), "{token}");
        }
    }
}
