//! Trip settlement (liquidación) arithmetic.
//!
//! Reconciles the fuel an operator actually loaded during a trip against
//! what the distance should have needed, turns any excess into a pay
//! deduction, and totals the pay statement. Pure logic; the API layer
//! supplies fuel loads and pay concepts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Fleet-average efficiency used when a trip does not specify one (km/l).
pub const DEFAULT_KM_PER_LITER: f64 = 3.2;

/// Id of the automatically generated fuel deduction concept.
pub const FUEL_DEDUCTION_CONCEPT_ID: &str = "auto-fuel-excess";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    Income,
    Deduction,
}

impl ConceptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Deduction => "deduction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptCategory {
    Base,
    Bonus,
    Advance,
    Fuel,
    Toll,
    Allowance,
    Other,
}

impl ConceptCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Bonus => "bonus",
            Self::Advance => "advance",
            Self::Fuel => "fuel",
            Self::Toll => "toll",
            Self::Allowance => "allowance",
            Self::Other => "other",
        }
    }
}

/// One line of an operator's pay statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayConcept {
    pub id: String,
    pub kind: ConceptKind,
    pub category: ConceptCategory,
    pub description: String,
    pub amount: f64,
    /// Calculated by the system rather than captured by hand.
    #[serde(default)]
    pub automatic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A fuel load reported at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelLoad {
    pub id: String,
    pub loaded_at: Timestamp,
    pub operator_id: String,
    pub unit_number: String,
    #[serde(default)]
    pub station: String,
    pub liters: f64,
    pub price_per_liter: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Authorized,
    Settled,
}

/// Everything needed to settle one trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementInput {
    pub trip_id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub unit_number: String,
    pub route: String,
    pub trip_start: Timestamp,
    pub trip_end: Timestamp,
    pub km_traveled: f64,
    #[serde(default)]
    pub km_per_liter: Option<f64>,
    pub price_per_liter: f64,
    /// Candidate loads; only the operator's loads inside the trip window count.
    #[serde(default)]
    pub fuel_loads: Vec<FuelLoad>,
    #[serde(default)]
    pub concepts: Vec<PayConcept>,
}

/// A computed pay statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSettlement {
    pub trip_id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub unit_number: String,
    pub route: String,
    pub km_traveled: f64,
    pub expected_liters: f64,
    pub actual_liters: f64,
    /// Positive means excess consumption, negative a saving.
    pub difference_liters: f64,
    pub price_per_liter: f64,
    pub fuel_deduction: f64,
    pub fuel_load_ids: Vec<String>,
    pub concepts: Vec<PayConcept>,
    pub total_income: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
    pub status: SettlementStatus,
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Liters a trip should have needed, rounded to the nearest liter.
pub fn expected_fuel_liters(km: f64, km_per_liter: f64) -> f64 {
    (km / km_per_liter).round()
}

/// Money deducted for excess consumption. Savings are never paid out.
pub fn fuel_deduction(difference_liters: f64, price_per_liter: f64) -> f64 {
    if difference_liters <= 0.0 {
        return 0.0;
    }
    round_cents(difference_liters * price_per_liter)
}

/// Loads made by `operator_id` within `[start, end]`.
pub fn fuel_loads_for_trip<'a>(
    loads: &'a [FuelLoad],
    operator_id: &str,
    start: Timestamp,
    end: Timestamp,
) -> Vec<&'a FuelLoad> {
    loads
        .iter()
        .filter(|l| l.operator_id == operator_id && l.loaded_at >= start && l.loaded_at <= end)
        .collect()
}

/// Sum of concept amounts of one kind.
pub fn total_by_kind(concepts: &[PayConcept], kind: ConceptKind) -> f64 {
    round_cents(
        concepts
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.amount)
            .sum(),
    )
}

/// Totals keyed `<kind>_<category>` (e.g. `deduction_advance`), first-seen order.
pub fn totals_by_category(concepts: &[PayConcept]) -> IndexMap<String, f64> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for c in concepts {
        let key = format!("{}_{}", c.kind.as_str(), c.category.as_str());
        *totals.entry(key).or_insert(0.0) += c.amount;
    }
    for total in totals.values_mut() {
        *total = round_cents(*total);
    }
    totals
}

/// Reconcile fuel and total the pay statement for one trip.
///
/// Any automatic fuel deduction already present in `input.concepts` is
/// replaced, so settling the same trip twice gives the same statement.
pub fn reconcile(input: SettlementInput) -> Result<TripSettlement, CoreError> {
    let km_per_liter = input.km_per_liter.unwrap_or(DEFAULT_KM_PER_LITER);
    if km_per_liter <= 0.0 {
        return Err(CoreError::Validation(
            "km_per_liter must be greater than zero".to_string(),
        ));
    }
    if input.km_traveled < 0.0 {
        return Err(CoreError::Validation(
            "km_traveled must not be negative".to_string(),
        ));
    }
    if input.price_per_liter < 0.0 {
        return Err(CoreError::Validation(
            "price_per_liter must not be negative".to_string(),
        ));
    }
    if input.trip_end < input.trip_start {
        return Err(CoreError::Validation(
            "trip_end must not be before trip_start".to_string(),
        ));
    }

    let trip_loads = fuel_loads_for_trip(
        &input.fuel_loads,
        &input.operator_id,
        input.trip_start,
        input.trip_end,
    );
    let actual_liters: f64 = trip_loads.iter().map(|l| l.liters).sum();
    let fuel_load_ids = trip_loads.iter().map(|l| l.id.clone()).collect();

    let expected_liters = expected_fuel_liters(input.km_traveled, km_per_liter);
    let difference_liters = actual_liters - expected_liters;
    let deduction = fuel_deduction(difference_liters, input.price_per_liter);

    let mut concepts: Vec<PayConcept> = input
        .concepts
        .into_iter()
        .filter(|c| !(c.automatic && c.id == FUEL_DEDUCTION_CONCEPT_ID))
        .collect();
    if deduction > 0.0 {
        concepts.push(PayConcept {
            id: FUEL_DEDUCTION_CONCEPT_ID.to_string(),
            kind: ConceptKind::Deduction,
            category: ConceptCategory::Fuel,
            description: "Exceso de Consumo (Deducción Diesel)".to_string(),
            amount: deduction,
            automatic: true,
            reference: Some(format!(
                "{difference_liters:.2}L × ${:.2} = Vale de Cobro",
                input.price_per_liter
            )),
        });
    }

    let total_income = total_by_kind(&concepts, ConceptKind::Income);
    let total_deductions = total_by_kind(&concepts, ConceptKind::Deduction);

    Ok(TripSettlement {
        trip_id: input.trip_id,
        operator_id: input.operator_id,
        operator_name: input.operator_name,
        unit_number: input.unit_number,
        route: input.route,
        km_traveled: input.km_traveled,
        expected_liters,
        actual_liters,
        difference_liters,
        price_per_liter: input.price_per_liter,
        fuel_deduction: deduction,
        fuel_load_ids,
        concepts,
        total_income,
        total_deductions,
        net_pay: round_cents(total_income - total_deductions),
        status: SettlementStatus::Pending,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32, hour: u32) -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    fn concept(id: &str, kind: ConceptKind, category: ConceptCategory, amount: f64) -> PayConcept {
        PayConcept {
            id: id.to_string(),
            kind,
            category,
            description: id.to_string(),
            amount,
            automatic: false,
            reference: None,
        }
    }

    fn load(id: &str, operator: &str, loaded_at: Timestamp, liters: f64) -> FuelLoad {
        FuelLoad {
            id: id.to_string(),
            loaded_at,
            operator_id: operator.to_string(),
            unit_number: "TR-204".to_string(),
            station: "Pemex".to_string(),
            liters,
            price_per_liter: 23.85,
        }
    }

    fn sample_input() -> SettlementInput {
        SettlementInput {
            trip_id: "SRV-2025-001".into(),
            operator_id: "OP-001".into(),
            operator_name: "Juan Pérez González".into(),
            unit_number: "TR-204".into(),
            route: "CDMX → Monterrey".into(),
            trip_start: at(8, 0),
            trip_end: at(9, 23),
            km_traveled: 942.0,
            km_per_liter: None,
            price_per_liter: 23.85,
            fuel_loads: vec![
                load("L1", "OP-001", at(8, 6), 200.0),
                load("L2", "OP-001", at(9, 2), 116.0),
                load("L3", "OP-002", at(8, 10), 150.0),
                load("L4", "OP-001", at(10, 8), 90.0),
            ],
            concepts: vec![
                concept("CP-001", ConceptKind::Income, ConceptCategory::Base, 4710.0),
                concept("CP-002", ConceptKind::Income, ConceptCategory::Bonus, 500.0),
                concept("CP-003", ConceptKind::Income, ConceptCategory::Allowance, 850.0),
                concept("CP-004", ConceptKind::Deduction, ConceptCategory::Advance, 1500.0),
                concept("CP-006", ConceptKind::Deduction, ConceptCategory::Advance, 200.0),
            ],
        }
    }

    #[test]
    fn expected_liters_round_to_nearest() {
        assert_eq!(expected_fuel_liters(942.0, DEFAULT_KM_PER_LITER), 294.0);
        assert_eq!(expected_fuel_liters(0.0, DEFAULT_KM_PER_LITER), 0.0);
    }

    #[test]
    fn savings_are_not_deducted() {
        assert_eq!(fuel_deduction(-12.0, 23.85), 0.0);
        assert_eq!(fuel_deduction(0.0, 23.85), 0.0);
        assert!((fuel_deduction(22.0, 23.85) - 524.70).abs() < 1e-9);
    }

    #[test]
    fn trip_window_filters_by_operator_and_time() {
        let input = sample_input();
        let loads = fuel_loads_for_trip(&input.fuel_loads, "OP-001", at(8, 0), at(9, 23));
        let ids: Vec<&str> = loads.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["L1", "L2"]);

        // Both window edges are inclusive.
        let edge = fuel_loads_for_trip(&input.fuel_loads, "OP-001", at(8, 6), at(9, 2));
        assert_eq!(edge.len(), 2);
    }

    #[test]
    fn category_totals_are_keyed_by_kind_and_category() {
        let totals = totals_by_category(&sample_input().concepts);
        let keys: Vec<&str> = totals.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["income_base", "income_bonus", "income_allowance", "deduction_advance"]
        );
        assert!((totals["deduction_advance"] - 1700.0).abs() < 1e-9);
    }

    #[test]
    fn reconcile_matches_reference_statement() {
        let s = reconcile(sample_input()).unwrap();

        assert_eq!(s.expected_liters, 294.0);
        assert_eq!(s.actual_liters, 316.0);
        assert_eq!(s.difference_liters, 22.0);
        assert!((s.fuel_deduction - 524.70).abs() < 1e-9);
        assert_eq!(s.fuel_load_ids, vec!["L1", "L2"]);
        assert!((s.total_income - 6060.0).abs() < 1e-9);
        assert!((s.total_deductions - 2224.70).abs() < 1e-9);
        assert!((s.net_pay - 3835.30).abs() < 1e-9);
        assert_eq!(s.status, SettlementStatus::Pending);

        let fuel = s.concepts.last().unwrap();
        assert_eq!(fuel.id, FUEL_DEDUCTION_CONCEPT_ID);
        assert!(fuel.automatic);
        assert_eq!(fuel.category, ConceptCategory::Fuel);
        assert_eq!(
            fuel.reference.as_deref(),
            Some("22.00L × $23.85 = Vale de Cobro")
        );
    }

    #[test]
    fn fuel_reference_shows_two_decimal_liters() {
        let mut input = sample_input();
        input.fuel_loads[1].liters = 116.1;
        let s = reconcile(input).unwrap();

        let fuel = s.concepts.last().unwrap();
        assert_eq!(
            fuel.reference.as_deref(),
            Some("22.10L × $23.85 = Vale de Cobro")
        );
    }

    #[test]
    fn reconcile_replaces_previous_automatic_deduction() {
        let first = reconcile(sample_input()).unwrap();

        let mut again = sample_input();
        again.concepts = first.concepts.clone();
        let second = reconcile(again).unwrap();

        assert_eq!(second.concepts.len(), first.concepts.len());
        assert!((second.net_pay - first.net_pay).abs() < 1e-9);
    }

    #[test]
    fn saving_trip_has_no_fuel_concept() {
        let mut input = sample_input();
        input.fuel_loads.truncate(1);
        let s = reconcile(input).unwrap();

        assert!(s.difference_liters < 0.0);
        assert_eq!(s.fuel_deduction, 0.0);
        assert!(s.concepts.iter().all(|c| c.category != ConceptCategory::Fuel));
    }

    #[test]
    fn reconcile_rejects_bad_inputs() {
        let mut input = sample_input();
        input.km_per_liter = Some(0.0);
        assert_matches!(reconcile(input), Err(CoreError::Validation(_)));

        let mut input = sample_input();
        input.trip_end = at(1, 0);
        assert_matches!(reconcile(input), Err(CoreError::Validation(_)));
    }
}
