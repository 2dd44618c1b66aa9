//! Route definitions for the `/import-types` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::import_types;
use crate::state::AppState;

/// Routes mounted at `/import-types`.
///
/// ```text
/// GET    /                  -> list_import_types
/// GET    /{id}              -> get_import_type
/// GET    /{id}/template     -> download_template   (text/csv)
/// POST   /{id}/validate     -> validate_rows       (?preview_limit, ?offset, ?limit)
/// POST   /{id}/upload       -> upload_csv          (multipart, same query)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(import_types::list_import_types))
        .route("/{id}", get(import_types::get_import_type))
        .route("/{id}/template", get(import_types::download_template))
        .route("/{id}/validate", post(import_types::validate_rows))
        .route("/{id}/upload", post(import_types::upload_csv))
}
