//! Whole-grid validation: header mapping, missing-column detection, and
//! per-row cell checks.

use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::cell::{required_message, validate_cell};
use super::rules::{ColumnRule, ImportTypeConfig, ValidationError, ValidationResult};

/// Column name used for the synthetic missing-header finding.
pub const HEADERS_COLUMN: &str = "headers";

/// Normalize a header for comparison: lowercase, accents removed, runs of
/// non-alphanumerics collapsed to a single `_`, no leading/trailing `_`.
///
/// `"Número Económico"` becomes `"numero_economico"`.
pub fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let folded = header
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>();
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Resolved positions of the configured columns within an uploaded header row.
#[derive(Debug)]
pub struct ColumnMapping<'a> {
    /// Rule bound to each header position, if any.
    by_position: Vec<Option<&'a ColumnRule>>,
    /// Header position of each configured rule, in config order.
    by_rule: Vec<(&'a ColumnRule, Option<usize>)>,
}

impl<'a> ColumnMapping<'a> {
    /// Bind each rule to the first header that matches it by normalized name,
    /// falling back to a plain case-insensitive comparison.
    pub fn resolve(headers: &[String], config: &'a ImportTypeConfig) -> Self {
        let trimmed: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
        let normalized: Vec<String> = trimmed.iter().map(|h| normalize_header(h)).collect();

        let mut by_position: Vec<Option<&'a ColumnRule>> = vec![None; headers.len()];
        let mut by_rule = Vec::with_capacity(config.columns.len());

        for rule in &config.columns {
            let key = normalize_header(&rule.name);
            let lower = rule.name.to_lowercase();
            let position = normalized
                .iter()
                .position(|h| *h == key)
                .or_else(|| trimmed.iter().position(|h| h.to_lowercase() == lower));

            // A header position belongs to the first rule that claims it.
            let position = position.filter(|&p| by_position[p].is_none());
            if let Some(p) = position {
                by_position[p] = Some(rule);
            }
            by_rule.push((rule, position));
        }

        Self {
            by_position,
            by_rule,
        }
    }

    /// Rule bound to a header position.
    pub fn rule_at(&self, position: usize) -> Option<&'a ColumnRule> {
        self.by_position.get(position).copied().flatten()
    }

    /// Names of required rules with no matching header, in config order.
    pub fn missing_required(&self) -> Vec<&'a str> {
        self.by_rule
            .iter()
            .filter(|(rule, position)| rule.required && position.is_none())
            .map(|&(rule, _)| rule.name.as_str())
            .collect()
    }

    /// Required rules that are present in the header row, with their position.
    fn required_present(&self) -> impl Iterator<Item = (&'a ColumnRule, usize)> + '_ {
        self.by_rule
            .iter()
            .filter(|(rule, _)| rule.required)
            .filter_map(|&(rule, position)| position.map(|p| (rule, p)))
    }
}

/// Validate every data row of `grid` against `config`.
///
/// Never fails: structural problems are reported as findings. Row numbers in
/// the result are sheet rows (the first data row is row 2).
pub fn validate_grid(grid: &[Vec<String>], config: &ImportTypeConfig) -> ValidationResult {
    let (headers, data_rows): (&[String], &[Vec<String>]) = match grid.split_first() {
        Some((header, rows)) => (header.as_slice(), rows),
        None => (&[], &[]),
    };

    let mapping = ColumnMapping::resolve(headers, config);
    let mut errors = Vec::new();

    let missing = mapping.missing_required();
    if !missing.is_empty() {
        errors.push(ValidationError {
            row: 0,
            column: HEADERS_COLUMN.to_string(),
            value: String::new(),
            message: format!(
                "Faltan columnas obligatorias: {}. Verifique los nombres en la primera fila.",
                missing.join(", ")
            ),
        });
    }

    let mut valid_row_count = 0;
    for (index, row) in data_rows.iter().enumerate() {
        let row_number = index + 2;
        let mut reported: HashSet<&str> = HashSet::new();

        for (position, cell) in row.iter().enumerate() {
            let Some(rule) = mapping.rule_at(position) else {
                continue;
            };
            if let Some(error) = validate_cell(cell, rule, row_number) {
                reported.insert(rule.name.as_str());
                errors.push(error);
            }
        }

        // Short rows never reach the cell loop for their trailing columns.
        for (rule, position) in mapping.required_present() {
            let blank = row.get(position).map_or(true, |v| v.trim().is_empty());
            if blank && reported.insert(rule.name.as_str()) {
                errors.push(ValidationError {
                    row: row_number,
                    column: rule.name.clone(),
                    value: String::new(),
                    message: required_message(&rule.name),
                });
            }
        }

        if reported.is_empty() {
            valid_row_count += 1;
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        valid_row_count,
        total_row_count: data_rows.len(),
    }
}
