//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for catalog listings that can hide inactive entries.
#[derive(Debug, Deserialize)]
pub struct ActiveOnlyParams {
    #[serde(default)]
    pub active_only: bool,
}

/// Display options for a validation report
/// (`?preview_limit=&offset=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub preview_limit: Option<usize>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}
