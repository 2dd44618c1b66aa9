//! HTTP-level integration tests for `/settlements/reconcile`.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json};
use serde_json::{json, Value};

fn trip_body() -> Value {
    json!({
        "trip_id": "SRV-2025-001",
        "operator_id": "OP-001",
        "operator_name": "Juan Pérez González",
        "unit_number": "TR-204",
        "route": "CDMX → Monterrey",
        "trip_start": "2025-01-08T00:00:00Z",
        "trip_end": "2025-01-09T23:00:00Z",
        "km_traveled": 942,
        "price_per_liter": 23.85,
        "fuel_loads": [
            {"id": "L1", "loaded_at": "2025-01-08T06:00:00Z", "operator_id": "OP-001",
             "unit_number": "TR-204", "liters": 200, "price_per_liter": 23.85},
            {"id": "L2", "loaded_at": "2025-01-09T02:00:00Z", "operator_id": "OP-001",
             "unit_number": "TR-204", "liters": 116, "price_per_liter": 23.85}
        ],
        "concepts": [
            {"id": "CP-001", "kind": "income", "category": "base", "description": "Sueldo Base", "amount": 4710},
            {"id": "CP-002", "kind": "income", "category": "bonus", "description": "Bono", "amount": 500},
            {"id": "CP-003", "kind": "income", "category": "allowance", "description": "Viáticos", "amount": 850},
            {"id": "CP-004", "kind": "deduction", "category": "advance", "description": "Anticipo", "amount": 1500},
            {"id": "CP-006", "kind": "deduction", "category": "advance", "description": "Anticipo", "amount": 200}
        ]
    })
}

fn approx(value: &Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 1e-9
}

#[tokio::test]
async fn reconcile_applies_fuel_deduction() {
    let response = post_json(build_test_app(), "/api/v1/settlements/reconcile", trip_body()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert!(approx(&data["expected_liters"], 294.0));
    assert!(approx(&data["actual_liters"], 316.0));
    assert!(approx(&data["fuel_deduction"], 524.70));
    assert!(approx(&data["net_pay"], 3835.30));
    assert_eq!(data["status"], "pending");
    assert!(approx(&data["totals_by_category"]["deduction_fuel"], 524.70));
    assert!(approx(&data["totals_by_category"]["deduction_advance"], 1700.0));
}

#[tokio::test]
async fn reconcile_rejects_reversed_window() {
    let mut body = trip_body();
    body["trip_end"] = json!("2025-01-01T00:00:00Z");

    let response = post_json(build_test_app(), "/api/v1/settlements/reconcile", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
