//! Order-planning output models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ingredient's row in an order plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanLine {
    pub ingredient_id: Uuid,
    pub name: String,
    pub unit: String,
    pub vendor: Option<String>,
    pub area: Option<String>,
    pub weekly_usage: Decimal,
    pub daily_usage: Decimal,
    pub par_level: Decimal,
    pub on_hand: Decimal,
    pub to_order: Decimal,
    pub cost_per_unit: Option<Decimal>,
    pub line_cost: Decimal,
}

/// Estimated purchase-order cost for one vendor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorTotal {
    /// `None` is the unassigned bucket
    pub vendor: Option<String>,
    pub line_count: usize,
    pub estimated_cost: Decimal,
}

/// Full order plan for a vendor selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderPlan {
    pub lines: Vec<PlanLine>,
    pub vendor_totals: Vec<VendorTotal>,
    pub total_cost: Decimal,
}
