//! Reconciliation arithmetic
//!
//! On-hand is never stored. It is the signed sum of an ingredient's
//! movements, and a physical count is turned into the single movement that
//! brings that sum to the observed value.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Direction, Movement};

/// Decimal places kept for movement quantities and observed counts
pub const QUANTITY_SCALE: u32 = 4;

/// Largest quantity, count, usage or cost a single record may carry.
/// Ten integer digits at ledger scale, the width of the stored columns.
pub const MAX_QUANTITY: Decimal = dec!(9999999999.9999);

/// Deltas smaller than this are accumulation noise, not a change
pub const ON_HAND_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Round a quantity to the ledger scale
pub fn normalize_quantity(quantity: Decimal) -> Decimal {
    quantity.round_dp(QUANTITY_SCALE).normalize()
}

/// Arithmetic on ledger values left the representable decimal range
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Quantity arithmetic overflowed the ledger range")]
pub struct QuantityOverflow;

/// Add two ledger values, failing instead of panicking on overflow
pub fn checked_total(a: Decimal, b: Decimal) -> Result<Decimal, QuantityOverflow> {
    a.checked_add(b).ok_or(QuantityOverflow)
}

/// Signed sum of a movement history
pub fn on_hand_from<'a, I>(movements: I) -> Result<Decimal, QuantityOverflow>
where
    I: IntoIterator<Item = &'a Movement>,
{
    movements
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, m| checked_total(acc, m.signed_quantity()))
}

/// The corrective movement a count requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub direction: Direction,
    pub quantity: Decimal,
}

/// Compute the minimal movement taking `current` to `observed`.
///
/// Returns `None` when the two already agree within [`ON_HAND_EPSILON`],
/// or when the difference vanishes at ledger scale.
pub fn adjustment_for(
    current: Decimal,
    observed: Decimal,
) -> Result<Option<Adjustment>, QuantityOverflow> {
    let delta = observed.checked_sub(current).ok_or(QuantityOverflow)?;
    if delta.abs() < ON_HAND_EPSILON {
        return Ok(None);
    }

    let quantity = normalize_quantity(delta.abs());
    if quantity.is_zero() {
        return Ok(None);
    }

    let direction = if delta > Decimal::ZERO {
        Direction::In
    } else {
        Direction::Out
    };

    Ok(Some(Adjustment {
        direction,
        quantity,
    }))
}
