pub mod catalogs;
pub mod health;
pub mod import_types;
pub mod settlements;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /import-types                                    list
/// /import-types/{id}                               get
/// /import-types/{id}/template                      CSV template download
/// /import-types/{id}/validate                      validate JSON rows (POST)
/// /import-types/{id}/upload                        validate CSV upload (POST, multipart)
///
/// /catalogs/unit-types                             list, replace all (PUT)
/// /catalogs/routes                                 list, add
/// /catalogs/routes/{id}                            update (PUT), delete
/// /catalogs/routes/{id}/toggle                     toggle active (POST)
///
/// /settlements/reconcile                           settle one trip (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/import-types", import_types::router())
        .nest("/catalogs", catalogs::router())
        .nest("/settlements", settlements::router())
}
