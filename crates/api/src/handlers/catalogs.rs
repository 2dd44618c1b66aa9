//! Handlers for the configurable catalogs (unit types, authorized routes).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tms_store::{AuthorizedRoute, NewRoute, UnitType, UpdateRoute};

use crate::error::AppResult;
use crate::query::ActiveOnlyParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Unit types
// ---------------------------------------------------------------------------

/// GET /api/v1/catalogs/unit-types
pub async fn list_unit_types(
    State(state): State<AppState>,
    Query(params): Query<ActiveOnlyParams>,
) -> AppResult<Json<DataResponse<Vec<UnitType>>>> {
    let data = if params.active_only {
        state.unit_types.active().await?
    } else {
        state.unit_types.list().await?
    };
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/catalogs/unit-types
pub async fn replace_unit_types(
    State(state): State<AppState>,
    Json(types): Json<Vec<UnitType>>,
) -> AppResult<Json<DataResponse<Vec<UnitType>>>> {
    let data = state.unit_types.replace_all(types).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Authorized routes
// ---------------------------------------------------------------------------

/// GET /api/v1/catalogs/routes
pub async fn list_routes(
    State(state): State<AppState>,
    Query(params): Query<ActiveOnlyParams>,
) -> AppResult<Json<DataResponse<Vec<AuthorizedRoute>>>> {
    let data = if params.active_only {
        state.routes.active().await?
    } else {
        state.routes.list().await?
    };
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/catalogs/routes
pub async fn create_route(
    State(state): State<AppState>,
    Json(input): Json<NewRoute>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthorizedRoute>>)> {
    let route = state.routes.add(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: route })))
}

/// PUT /api/v1/catalogs/routes/{id}
pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRoute>,
) -> AppResult<Json<DataResponse<AuthorizedRoute>>> {
    let route = state.routes.update(&id, input).await?;
    Ok(Json(DataResponse { data: route }))
}

/// DELETE /api/v1/catalogs/routes/{id}
pub async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.routes.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/catalogs/routes/{id}/toggle
pub async fn toggle_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<AuthorizedRoute>>> {
    let route = state.routes.toggle_active(&id).await?;
    tracing::info!(route_id = %route.id, active = route.active, "Authorized route toggled");
    Ok(Json(DataResponse { data: route }))
}
