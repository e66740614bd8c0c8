//! Free-text validation-rule extraction.
//!
//! Parses a validation cell like `"email, minimo:5, maximo:200"` into
//! structured rules. Matching is case-insensitive, accent-tolerant, and
//! bilingual; the checks are independent and all may fire for one cell.
//! Unrecognized text yields an empty list, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ValidationRule, ValidationRuleType};

/// `min` / `mínimo` followed by an optional separator and digits.
static MIN_LENGTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)m[ií]n(?:imo)?\s*[:=]?\s*(\d+)").expect("valid regex"));

/// `max` / `máximo` followed by an optional separator and digits.
static MAX_LENGTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)m[aá]x(?:imo)?\s*[:=]?\s*(\d+)").expect("valid regex"));

/// Extract every recognizable rule from a validation cell.
pub fn parse_validations(text: &str) -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    if text.to_lowercase().contains("email") {
        rules.push(ValidationRule {
            rule_type: ValidationRuleType::EmailFormat,
            value: None,
            message: "must be a valid email".into(),
        });
    }

    if let Some(value) = capture_bound(&MIN_LENGTH_RE, text) {
        rules.push(ValidationRule {
            rule_type: ValidationRuleType::MinLength,
            value: Some(value),
            message: format!("must be at least {value} characters"),
        });
    }

    if let Some(value) = capture_bound(&MAX_LENGTH_RE, text) {
        rules.push(ValidationRule {
            rule_type: ValidationRuleType::MaxLength,
            value: Some(value),
            message: format!("must be at most {value} characters"),
        });
    }

    rules
}

fn capture_bound(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}
