use axum::Json;
use indexmap::IndexMap;
use serde::Serialize;
use tms_core::settlement::{
    reconcile as reconcile_trip, totals_by_category, SettlementInput, TripSettlement,
};

use crate::error::AppResult;
use crate::response::DataResponse;

/// A settled trip plus its per-category totals.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    #[serde(flatten)]
    pub settlement: TripSettlement,
    pub totals_by_category: IndexMap<String, f64>,
}

/// POST /api/v1/settlements/reconcile
///
/// Reconcile fuel and compute the pay statement for one trip. Nothing is
/// stored; the client keeps the result.
pub async fn reconcile(
    Json(input): Json<SettlementInput>,
) -> AppResult<Json<DataResponse<SettlementResponse>>> {
    let settlement = reconcile_trip(input)?;
    tracing::info!(
        trip_id = %settlement.trip_id,
        difference_liters = settlement.difference_liters,
        fuel_deduction = settlement.fuel_deduction,
        net_pay = settlement.net_pay,
        "Trip settled",
    );

    let totals = totals_by_category(&settlement.concepts);
    Ok(Json(DataResponse {
        data: SettlementResponse {
            settlement,
            totals_by_category: totals,
        },
    }))
}
