//! Route definitions for the `/catalogs` resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::catalogs;
use crate::state::AppState;

/// Routes mounted at `/catalogs`.
///
/// ```text
/// GET    /unit-types          -> list_unit_types     (?active_only)
/// PUT    /unit-types          -> replace_unit_types
/// GET    /routes              -> list_routes         (?active_only)
/// POST   /routes              -> create_route
/// PUT    /routes/{id}         -> update_route
/// DELETE /routes/{id}         -> delete_route
/// POST   /routes/{id}/toggle  -> toggle_route
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/unit-types",
            get(catalogs::list_unit_types).put(catalogs::replace_unit_types),
        )
        .route(
            "/routes",
            get(catalogs::list_routes).post(catalogs::create_route),
        )
        .route(
            "/routes/{id}",
            put(catalogs::update_route).delete(catalogs::delete_route),
        )
        .route("/routes/{id}/toggle", post(catalogs::toggle_route))
}
