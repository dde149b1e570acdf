//! Ledger storage
//!
//! The store owns the ingredient directory and the append-only movement log.
//! On-hand is always computed from the log; there is no stored counter and no
//! way to update or delete a movement.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    normalize_quantity, validate_movement_quantity, validate_non_negative, Ingredient, Movement,
    NewIngredient, NewMovement, UsageAndParUpdate,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Durable ledger of stock movements plus the ingredient directory
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Probe the backing store
    async fn ping(&self) -> AppResult<()>;

    async fn create_ingredient(&self, input: NewIngredient) -> AppResult<Ingredient>;

    async fn get_ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>>;

    /// All ingredients ordered by name
    async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>>;

    /// Overwrite the planning fields; fails with `NotFound` for an unknown id
    async fn set_usage_and_par(
        &self,
        id: Uuid,
        weekly_usage: Decimal,
        par_override: Option<Decimal>,
    ) -> AppResult<Ingredient>;

    /// Signed sum of the ingredient's movements, zero when there are none
    async fn get_on_hand(&self, ingredient_id: Uuid) -> AppResult<Decimal>;

    /// On-hand for every ingredient in the directory, including those with no movements
    async fn get_on_hand_all(&self) -> AppResult<HashMap<Uuid, Decimal>>;

    /// Movement history, oldest first
    async fn list_movements(&self, ingredient_id: Uuid) -> AppResult<Vec<Movement>>;

    /// Append one movement
    async fn append_movement(&self, movement: NewMovement) -> AppResult<Movement>;

    /// Append one movement only if the ingredient's on-hand still equals
    /// `expected_on_hand`. The check and the insert are atomic with respect
    /// to every other write for that ingredient. Returns `None` when the
    /// on-hand value had moved.
    async fn append_movement_if_on_hand(
        &self,
        movement: NewMovement,
        expected_on_hand: Decimal,
    ) -> AppResult<Option<Movement>>;
}

/// Validate a movement and bring it to ledger scale.
///
/// Rejects negative and zero quantities, including quantities that round to
/// zero at ledger scale, and a blank source tag. Ingredient existence is
/// checked by each store inside its write path.
pub(crate) fn prepare_movement(mut movement: NewMovement) -> AppResult<NewMovement> {
    validate_movement_quantity(movement.quantity)
        .map_err(|msg| AppError::validation("quantity", msg))?;

    movement.quantity = normalize_quantity(movement.quantity);
    validate_movement_quantity(movement.quantity).map_err(|_| {
        AppError::validation("quantity", "Quantity is below the ledger's precision")
    })?;

    if let Some(cost) = movement.unit_cost {
        validate_non_negative(cost).map_err(|msg| AppError::validation("unit_cost", msg))?;
    }

    movement.source = movement.source.trim().to_string();
    if movement.source.is_empty() {
        return Err(AppError::validation("source", "Source is required"));
    }

    movement.reference = movement
        .reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    Ok(movement)
}

/// Validate a new directory entry and trim its text fields
pub(crate) fn prepare_ingredient(input: NewIngredient) -> AppResult<NewIngredient> {
    input.validate()?;
    Ok(input.normalized())
}

/// Validate planning fields before they are written
pub(crate) fn check_usage_and_par(
    weekly_usage: Decimal,
    par_override: Option<Decimal>,
) -> AppResult<()> {
    UsageAndParUpdate {
        weekly_usage,
        par_override,
    }
    .validate()?;
    Ok(())
}
