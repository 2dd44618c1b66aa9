//! Handlers for the `/import-types` resource: catalog browsing, template
//! download, and validation of pasted rows or uploaded CSV files.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tms_core::bulk_import::grid::{build_template_csv, parse_csv_grid};
use tms_core::bulk_import::report::DEFAULT_ERROR_PAGE_SIZE;
use tms_core::bulk_import::{
    validate_grid, ImportTypeConfig, ReportOptions, ValidationReport,
};
use tms_core::types::RawGrid;

use crate::error::{AppError, AppResult};
use crate::query::ReportParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field that carries the CSV file.
const UPLOAD_FIELD: &str = "file";

/// Catalog listing entry.
#[derive(Debug, Serialize)]
pub struct ImportTypeSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub backend_endpoint: String,
    pub column_count: usize,
    pub required_columns: Vec<String>,
}

impl From<&ImportTypeConfig> for ImportTypeSummary {
    fn from(config: &ImportTypeConfig) -> Self {
        Self {
            id: config.id.clone(),
            title: config.title.clone(),
            description: config.description.clone(),
            backend_endpoint: config.backend_endpoint.clone(),
            column_count: config.columns.len(),
            required_columns: config
                .columns
                .iter()
                .filter(|c| c.required)
                .map(|c| c.name.clone())
                .collect(),
        }
    }
}

/// Request body for [`validate_rows`]: the header row followed by data rows.
#[derive(Debug, Deserialize)]
pub struct ValidateRowsRequest {
    pub rows: RawGrid,
}

/// GET /api/v1/import-types
pub async fn list_import_types(
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<ImportTypeSummary>>> {
    let data = state.imports.iter().map(ImportTypeSummary::from).collect();
    Json(DataResponse { data })
}

/// GET /api/v1/import-types/{id}
pub async fn get_import_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ImportTypeConfig>>> {
    let config = state.imports.require(&id)?;
    Ok(Json(DataResponse {
        data: config.clone(),
    }))
}

/// GET /api/v1/import-types/{id}/template
///
/// Download the CSV template (header row plus sample rows) as an attachment.
pub async fn download_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, [(HeaderName, String); 2], String)> {
    let config = state.imports.require(&id)?;
    let csv = build_template_csv(config)?;
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"plantilla_{}.csv\"", config.id),
            ),
        ],
        csv,
    ))
}

/// POST /api/v1/import-types/{id}/validate
///
/// Validate rows already parsed by the client.
pub async fn validate_rows(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ReportParams>,
    Json(body): Json<ValidateRowsRequest>,
) -> AppResult<Json<DataResponse<ValidationReport>>> {
    let config = state.imports.require(&id)?;
    let report = run_validation(&state, config, &body.rows, &params);
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/import-types/{id}/upload
///
/// Validate an uploaded CSV file sent as the `file` multipart field.
pub async fn upload_csv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ReportParams>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ValidationReport>>> {
    let config = state.imports.require(&id)?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        tracing::debug!(import_type = %config.id, file_name, size = bytes.len(), "Received CSV upload");
        data = Some(bytes);
        break;
    }

    let data = data.ok_or_else(|| {
        AppError::BadRequest(format!("Missing multipart field '{UPLOAD_FIELD}'"))
    })?;
    let grid = parse_csv_grid(&data)?;

    let report = run_validation(&state, config, &grid, &params);
    Ok(Json(DataResponse { data: report }))
}

fn run_validation(
    state: &AppState,
    config: &ImportTypeConfig,
    grid: &[Vec<String>],
    params: &ReportParams,
) -> ValidationReport {
    let result = validate_grid(grid, config);
    tracing::info!(
        import_type = %config.id,
        total_rows = result.total_row_count,
        valid_rows = result.valid_row_count,
        errors = result.errors.len(),
        is_valid = result.is_valid,
        "Validated import grid",
    );

    let options = ReportOptions {
        preview_limit: params
            .preview_limit
            .unwrap_or(state.config.error_preview_limit),
        offset: params.offset.unwrap_or(0),
        limit: params.limit.unwrap_or(DEFAULT_ERROR_PAGE_SIZE),
    };
    ValidationReport::build(&config.id, result, options)
}
