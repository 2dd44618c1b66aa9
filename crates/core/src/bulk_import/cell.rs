//! Single-cell validation against one column rule.
//!
//! Checks run in a fixed order and the first failure is the only one
//! reported for the cell: presence, type, length, pattern.

use chrono::NaiveDate;

use super::rules::{ColumnKind, ColumnRule, ValidationError};

/// Accepted boolean spellings, compared case-insensitively.
pub const BOOLEAN_VALUES: &[&str] = &["true", "false", "1", "0", "si", "no", "yes", "no"];

/// Message used whenever a required column has no value in a row.
pub fn required_message(column: &str) -> String {
    format!("Campo obligatorio \"{column}\" está vacío")
}

/// Validate one raw cell. `row` is the 1-based sheet row the cell came from.
pub fn validate_cell(value: &str, rule: &ColumnRule, row: usize) -> Option<ValidationError> {
    let trimmed = value.trim();
    let fail = |message: String| {
        Some(ValidationError {
            row,
            column: rule.name.clone(),
            value: trimmed.to_string(),
            message,
        })
    };

    if trimmed.is_empty() {
        return if rule.required {
            fail(required_message(&rule.name))
        } else {
            None
        };
    }

    if let Some(message) = check_type(trimmed, rule) {
        return fail(message);
    }

    if let Some((min, max)) = rule.kind.length_bounds() {
        let len = trimmed.chars().count();
        if let Some(min) = min.filter(|&m| len < m) {
            return fail(format!("\"{}\" mín. {min} caracteres", rule.name));
        }
        if let Some(max) = max.filter(|&m| len > m) {
            return fail(format!("\"{}\" máx. {max} caracteres", rule.name));
        }
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(trimmed) {
            let message = pattern
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("\"{}\" formato inválido", rule.name));
            return fail(message);
        }
    }

    None
}

/// Type-specific check on a non-empty trimmed value.
fn check_type(value: &str, rule: &ColumnRule) -> Option<String> {
    let name = &rule.name;
    match &rule.kind {
        ColumnKind::Number => {
            if parse_number(value).is_none() {
                return Some(format!("\"{name}\" debe ser un número válido"));
            }
        }
        ColumnKind::Date => match split_date(value) {
            None => {
                return Some(format!(
                    "\"{name}\" debe tener formato AAAA-MM-DD o DD/MM/AAAA"
                ))
            }
            Some((y, m, d)) => {
                if NaiveDate::from_ymd_opt(y, m, d).is_none() {
                    return Some(format!("\"{name}\" no es una fecha válida"));
                }
            }
        },
        ColumnKind::Enum { values, .. } => {
            if !enum_accepts(values, value) {
                return Some(format!(
                    "\"{name}\" valor inválido. Opciones: {}",
                    values.join(", ")
                ));
            }
        }
        ColumnKind::Boolean => {
            let lower = value.to_lowercase();
            if !BOOLEAN_VALUES.contains(&lower.as_str()) {
                return Some(format!("\"{name}\" debe ser SI/NO"));
            }
        }
        ColumnKind::String { .. } => {}
    }
    None
}

/// Parse a numeric cell, tolerating thousands separators (`1,200.50`).
fn parse_number(value: &str) -> Option<f64> {
    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Split `YYYY-MM-DD` or `DD/MM/YYYY` into `(year, month, day)`.
///
/// Only the shape is checked here; calendar validity is left to the caller.
fn split_date(value: &str) -> Option<(i32, u32, u32)> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let digits_at = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = value.get(range)?;
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };

    if bytes[4] == b'-' && bytes[7] == b'-' {
        let year = digits_at(0..4)?;
        Some((year as i32, digits_at(5..7)?, digits_at(8..10)?))
    } else if bytes[2] == b'/' && bytes[5] == b'/' {
        let year = digits_at(6..10)?;
        Some((year as i32, digits_at(3..5)?, digits_at(0..2)?))
    } else {
        None
    }
}

/// Exact, lowercased, uppercased, or `_`-insensitive match against the options.
fn enum_accepts(values: &[String], value: &str) -> bool {
    let lower = value.to_lowercase();
    let upper = value.to_uppercase();
    let normalized = normalize_option(value);
    values
        .iter()
        .any(|v| v == value || *v == lower || *v == upper || normalize_option(v) == normalized)
}

fn normalize_option(value: &str) -> String {
    value.to_lowercase().replace('_', " ")
}
