//! WebAssembly bindings for the pantry ledger
//!
//! Lets a counting kiosk preview, before submitting:
//! - Par level and reorder quantity
//! - Line cost estimates
//! - The adjustment a physical count will post
//! - A full order plan from cached directory and stock data

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shared::{PlanningPolicy, QuantityOverflow};
use thiserror::Error;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

pub use shared::models::*;
pub use shared::types::*;

/// Failures surfaced to JavaScript as string errors
#[derive(Debug, Error)]
enum BindingError {
    #[error("Invalid number: {0}")]
    InvalidNumber(f64),

    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid {what} JSON: {source}")]
    InvalidJson {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialization(serde_json::Error),

    #[error(transparent)]
    Overflow(#[from] QuantityOverflow),
}

impl From<BindingError> for JsValue {
    fn from(err: BindingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// NaN, infinities and values outside the decimal range are rejected
fn to_decimal(value: f64) -> Result<Decimal, BindingError> {
    Decimal::try_from(value).map_err(|_| BindingError::InvalidNumber(value))
}

fn to_f64(value: Decimal) -> Result<f64, BindingError> {
    value.to_f64().ok_or(BindingError::Overflow(QuantityOverflow))
}

fn par(weekly_usage: f64, par_override: f64) -> Result<f64, BindingError> {
    let par = shared::compute_par(to_decimal(weekly_usage)?, Some(to_decimal(par_override)?))?;
    to_f64(par)
}

fn order(on_hand: f64, par_level: f64) -> Result<f64, BindingError> {
    to_f64(shared::compute_order(to_decimal(on_hand)?, to_decimal(par_level)?)?)
}

fn line_cost(to_order: f64, cost_per_unit: Option<f64>) -> Result<f64, BindingError> {
    let cost = cost_per_unit.map(to_decimal).transpose()?;
    to_f64(shared::compute_line_cost(to_decimal(to_order)?, cost)?)
}

fn adjustment_preview(current_on_hand: f64, observed_quantity: f64) -> Result<String, BindingError> {
    let current = to_decimal(current_on_hand)?;
    let observed = to_decimal(observed_quantity)?;
    shared::validate_observed_quantity(observed).map_err(BindingError::Validation)?;

    let adjustment = shared::adjustment_for(current, shared::normalize_quantity(observed))?;
    serde_json::to_string(&adjustment).map_err(BindingError::Serialization)
}

fn order_plan(
    ingredients_json: &str,
    on_hand_json: &str,
    vendor: Option<&str>,
    safety_multiplier: Option<f64>,
) -> Result<String, BindingError> {
    let ingredients: Vec<Ingredient> =
        serde_json::from_str(ingredients_json).map_err(|source| BindingError::InvalidJson {
            what: "ingredients",
            source,
        })?;
    let on_hand: HashMap<Uuid, Decimal> =
        serde_json::from_str(on_hand_json).map_err(|source| BindingError::InvalidJson {
            what: "on-hand",
            source,
        })?;

    let policy = match safety_multiplier {
        Some(m) => {
            let multiplier = to_decimal(m)?;
            if multiplier <= Decimal::ZERO {
                return Err(BindingError::Validation("Safety multiplier must be positive"));
            }
            PlanningPolicy::new(multiplier)
        }
        None => PlanningPolicy::default(),
    };
    let filter = VendorFilter::parse(vendor);

    let plan = policy.build_plan(&ingredients, &on_hand, &filter)?;
    serde_json::to_string(&plan).map_err(BindingError::Serialization)
}

/// Par level; an override of 0 falls back to the usage formula
#[wasm_bindgen]
pub fn compute_par(weekly_usage: f64, par_override: f64) -> Result<f64, JsValue> {
    Ok(par(weekly_usage, par_override)?)
}

/// Quantity to reorder, never negative
#[wasm_bindgen]
pub fn compute_order(on_hand: f64, par_level: f64) -> Result<f64, JsValue> {
    Ok(order(on_hand, par_level)?)
}

/// Estimated cost for an order line
#[wasm_bindgen]
pub fn compute_line_cost(to_order: f64, cost_per_unit: Option<f64>) -> Result<f64, JsValue> {
    Ok(line_cost(to_order, cost_per_unit)?)
}

/// Adjustment a count would post, as JSON (`null` when nothing changes)
#[wasm_bindgen]
pub fn preview_adjustment(current_on_hand: f64, observed_quantity: f64) -> Result<String, JsValue> {
    Ok(adjustment_preview(current_on_hand, observed_quantity)?)
}

/// Build an order plan from JSON ingredients and an on-hand map keyed by ingredient id
#[wasm_bindgen]
pub fn build_order_plan(
    ingredients_json: &str,
    on_hand_json: &str,
    vendor: Option<String>,
    safety_multiplier: Option<f64>,
) -> Result<String, JsValue> {
    Ok(order_plan(
        ingredients_json,
        on_hand_json,
        vendor.as_deref(),
        safety_multiplier,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour_json(id: Uuid, weekly_usage: &str) -> String {
        format!(
            r#"[{{"id":"{}","name":"Flour","unit":"lb","vendor":"Bakemark","area":null,
                "weekly_usage":"{}","par_override":null,"cost_per_unit":"2",
                "created_at":"2025-01-01T00:00:00Z"}}]"#,
            id, weekly_usage
        )
    }

    #[test]
    fn test_compute_par() {
        assert!((compute_par(70.0, 0.0).unwrap() - 110.0).abs() < 1e-9);
        assert!((compute_par(70.0, 50.0).unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_order() {
        assert_eq!(compute_order(120.0, 110.0).unwrap(), 0.0);
        assert!((compute_order(20.0, 110.0).unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_line_cost_without_cost() {
        assert_eq!(compute_line_cost(90.0, None).unwrap(), 0.0);
        assert!((compute_line_cost(8.0, Some(2.5)).unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_preview_adjustment() {
        let json = preview_adjustment(50.0, 47.0).unwrap();
        assert_eq!(json, r#"{"direction":"out","quantity":"3"}"#);
        assert_eq!(preview_adjustment(47.0, 47.0).unwrap(), "null");
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        assert!(matches!(to_decimal(f64::NAN), Err(BindingError::InvalidNumber(_))));
        assert!(matches!(to_decimal(f64::INFINITY), Err(BindingError::InvalidNumber(_))));
        assert!(matches!(to_decimal(1e30), Err(BindingError::InvalidNumber(_))));

        assert!(matches!(par(f64::NAN, 0.0), Err(BindingError::InvalidNumber(_))));
        assert!(matches!(order(f64::NAN, 110.0), Err(BindingError::InvalidNumber(_))));
        assert!(matches!(line_cost(8.0, Some(f64::NAN)), Err(BindingError::InvalidNumber(_))));
    }

    #[test]
    fn test_nan_count_does_not_preview_an_adjustment() {
        assert!(matches!(
            adjustment_preview(50.0, f64::NAN),
            Err(BindingError::InvalidNumber(_))
        ));
        assert!(matches!(
            adjustment_preview(50.0, f64::INFINITY),
            Err(BindingError::InvalidNumber(_))
        ));
        assert!(matches!(
            adjustment_preview(f64::NAN, 47.0),
            Err(BindingError::InvalidNumber(_))
        ));
        assert!(matches!(
            adjustment_preview(50.0, -1.0),
            Err(BindingError::Validation(_))
        ));
    }

    #[test]
    fn test_build_order_plan() {
        let id = Uuid::new_v4();
        let on_hand = format!(r#"{{"{}":"47"}}"#, id);

        let json = build_order_plan(&flour_json(id, "35"), &on_hand, None, None).unwrap();
        let plan: OrderPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].to_order, Decimal::from(8));
        assert_eq!(plan.total_cost, Decimal::from(16));
    }

    #[test]
    fn test_order_plan_rejects_bad_input() {
        let id = Uuid::new_v4();
        assert!(matches!(
            order_plan("not json", "{}", None, None),
            Err(BindingError::InvalidJson { what: "ingredients", .. })
        ));
        assert!(matches!(
            order_plan(&flour_json(id, "35"), "{}", None, Some(f64::NAN)),
            Err(BindingError::InvalidNumber(_))
        ));
        assert!(matches!(
            order_plan(&flour_json(id, "35"), "{}", None, Some(0.0)),
            Err(BindingError::Validation(_))
        ));
        assert!(matches!(
            order_plan(&flour_json(id, "79228162514264337593543950335"), "{}", None, None),
            Err(BindingError::Overflow(_))
        ));
    }
}
