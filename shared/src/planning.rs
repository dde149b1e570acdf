//! Par level and order planning
//!
//! Par is the stock that should be on the shelf to cover a safety window of
//! usage. Unless an ingredient carries a positive manual override it is
//! derived from weekly usage:
//!
//! ```text
//! daily_usage = weekly_usage / 7
//! par_level   = daily_usage * safety_multiplier   (11 by default)
//! to_order    = max(0, par_level - on_hand)
//! ```

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Ingredient, OrderPlan, PlanLine, VendorTotal};
use crate::reconcile::{checked_total, QuantityOverflow};
use crate::types::VendorFilter;

/// Days of coverage used when no policy is configured (about 1.5 weeks)
pub const DEFAULT_SAFETY_MULTIPLIER: Decimal = dec!(11);

pub const DAYS_PER_WEEK: Decimal = dec!(7);

/// Decimal places kept for formula par and daily usage
pub const PAR_SCALE: u32 = 4;

/// Decimal places kept for cost estimates
pub const COST_SCALE: u32 = 2;

/// Business policy for par computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanningPolicy {
    pub safety_multiplier: Decimal,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        Self {
            safety_multiplier: DEFAULT_SAFETY_MULTIPLIER,
        }
    }
}

impl PlanningPolicy {
    pub fn new(safety_multiplier: Decimal) -> Self {
        Self { safety_multiplier }
    }

    /// Par from usage alone
    pub fn formula_par(&self, weekly_usage: Decimal) -> Result<Decimal, QuantityOverflow> {
        let par = daily_usage(weekly_usage)
            .checked_mul(self.safety_multiplier)
            .ok_or(QuantityOverflow)?;
        Ok(par.round_dp(PAR_SCALE))
    }

    /// Par with a positive override taking precedence over the formula
    pub fn par_level(
        &self,
        weekly_usage: Decimal,
        par_override: Option<Decimal>,
    ) -> Result<Decimal, QuantityOverflow> {
        match par_override {
            Some(par) if par > Decimal::ZERO => Ok(par),
            _ => self.formula_par(weekly_usage),
        }
    }

    /// Build the plan for every ingredient matching `filter`.
    ///
    /// Ingredients missing from `on_hand` are treated as having no stock.
    /// Lines are ordered by vendor then name, unassigned vendors last; vendor
    /// totals follow the same order.
    pub fn build_plan(
        &self,
        ingredients: &[Ingredient],
        on_hand: &HashMap<Uuid, Decimal>,
        filter: &VendorFilter,
    ) -> Result<OrderPlan, QuantityOverflow> {
        let mut lines = ingredients
            .iter()
            .filter(|i| filter.matches(i.vendor_key()))
            .map(|i| {
                let stock = on_hand.get(&i.id).copied().unwrap_or(Decimal::ZERO);
                self.plan_line(i, stock)
            })
            .collect::<Result<Vec<PlanLine>, _>>()?;

        lines.sort_by(|a, b| {
            (a.vendor.is_none(), &a.vendor, &a.name).cmp(&(b.vendor.is_none(), &b.vendor, &b.name))
        });

        let vendor_totals = vendor_totals(&lines)?;
        let total_cost = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| checked_total(acc, l.line_cost))?;

        Ok(OrderPlan {
            lines,
            vendor_totals,
            total_cost,
        })
    }

    fn plan_line(
        &self,
        ingredient: &Ingredient,
        on_hand: Decimal,
    ) -> Result<PlanLine, QuantityOverflow> {
        let par_level = self.par_level(ingredient.weekly_usage, ingredient.par_override)?;
        let to_order = compute_order(on_hand, par_level)?;

        Ok(PlanLine {
            ingredient_id: ingredient.id,
            name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
            vendor: ingredient.vendor_key().map(str::to_string),
            area: ingredient.area.clone(),
            weekly_usage: ingredient.weekly_usage,
            daily_usage: daily_usage(ingredient.weekly_usage).round_dp(PAR_SCALE),
            par_level,
            on_hand,
            to_order,
            cost_per_unit: ingredient.cost_per_unit,
            line_cost: compute_line_cost(to_order, ingredient.cost_per_unit)?,
        })
    }
}

pub fn daily_usage(weekly_usage: Decimal) -> Decimal {
    weekly_usage / DAYS_PER_WEEK
}

/// Par level under the default policy
pub fn compute_par(
    weekly_usage: Decimal,
    par_override: Option<Decimal>,
) -> Result<Decimal, QuantityOverflow> {
    PlanningPolicy::default().par_level(weekly_usage, par_override)
}

/// Shortfall against par; overstock orders nothing
pub fn compute_order(on_hand: Decimal, par_level: Decimal) -> Result<Decimal, QuantityOverflow> {
    let shortfall = par_level.checked_sub(on_hand).ok_or(QuantityOverflow)?;
    Ok(shortfall.max(Decimal::ZERO))
}

/// Estimated cost of an order line; a missing unit cost counts as zero
pub fn compute_line_cost(
    to_order: Decimal,
    cost_per_unit: Option<Decimal>,
) -> Result<Decimal, QuantityOverflow> {
    let cost = to_order
        .checked_mul(cost_per_unit.unwrap_or(Decimal::ZERO))
        .ok_or(QuantityOverflow)?;
    Ok(cost.round_dp(COST_SCALE))
}

fn vendor_totals(lines: &[PlanLine]) -> Result<Vec<VendorTotal>, QuantityOverflow> {
    let mut named: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
    let mut unassigned: Option<(usize, Decimal)> = None;

    for line in lines {
        let slot = match line.vendor.as_deref() {
            Some(vendor) => named.entry(vendor).or_insert((0, Decimal::ZERO)),
            None => unassigned.get_or_insert((0, Decimal::ZERO)),
        };
        slot.0 += 1;
        slot.1 = checked_total(slot.1, line.line_cost)?;
    }

    Ok(named
        .into_iter()
        .map(|(vendor, (line_count, estimated_cost))| VendorTotal {
            vendor: Some(vendor.to_string()),
            line_count,
            estimated_cost,
        })
        .chain(unassigned.map(|(line_count, estimated_cost)| VendorTotal {
            vendor: None,
            line_count,
            estimated_cost,
        }))
        .collect())
}
