//! Shaping validation errors for display: grouping, previews, and pages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::rules::{ValidationError, ValidationResult};

/// Number of errors shown in a preview when the caller does not say.
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;

/// Default page size for the error table.
pub const DEFAULT_ERROR_PAGE_SIZE: usize = 50;

/// Upper bound on a single error page.
pub const MAX_ERROR_PAGE_SIZE: usize = 500;

/// Group errors by sheet row, keeping rows in the order first encountered.
pub fn group_by_row(errors: &[ValidationError]) -> IndexMap<usize, Vec<ValidationError>> {
    let mut grouped: IndexMap<usize, Vec<ValidationError>> = IndexMap::new();
    for error in errors {
        grouped.entry(error.row).or_default().push(error.clone());
    }
    grouped
}

/// The first `limit` errors.
pub fn error_preview(errors: &[ValidationError], limit: usize) -> &[ValidationError] {
    &errors[..limit.min(errors.len())]
}

/// One page of the error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPage {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub items: Vec<ValidationError>,
}

/// Slice `errors` at `offset`, clamping `limit` to `1..=MAX_ERROR_PAGE_SIZE`.
pub fn page_errors(errors: &[ValidationError], offset: usize, limit: usize) -> ErrorPage {
    let limit = limit.clamp(1, MAX_ERROR_PAGE_SIZE);
    let start = offset.min(errors.len());
    let end = start.saturating_add(limit).min(errors.len());
    ErrorPage {
        total: errors.len(),
        offset,
        limit,
        items: errors[start..end].to_vec(),
    }
}

/// Errors belonging to one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowErrors {
    pub row: usize,
    pub errors: Vec<ValidationError>,
}

/// Display options for [`ValidationReport::build`].
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub preview_limit: usize,
    pub offset: usize,
    pub limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            offset: 0,
            limit: DEFAULT_ERROR_PAGE_SIZE,
        }
    }
}

/// Everything the upload screen needs from one validation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub import_type: String,
    pub result: ValidationResult,
    pub preview: Vec<ValidationError>,
    pub errors_by_row: Vec<RowErrors>,
    pub page: ErrorPage,
}

impl ValidationReport {
    pub fn build(import_type: &str, result: ValidationResult, options: ReportOptions) -> Self {
        let preview = error_preview(&result.errors, options.preview_limit).to_vec();
        let errors_by_row = group_by_row(&result.errors)
            .into_iter()
            .map(|(row, errors)| RowErrors { row, errors })
            .collect();
        let page = page_errors(&result.errors, options.offset, options.limit);

        Self {
            import_type: import_type.to_string(),
            result,
            preview,
            errors_by_row,
            page,
        }
    }
}
