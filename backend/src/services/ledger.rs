//! Ledger service for stock reads and direct movement posting

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{Direction, Ingredient, Movement, NewMovement, UsageReason};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::LedgerStore;

#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
}

/// Current stock for one ingredient
#[derive(Debug, Clone, Serialize)]
pub struct OnHand {
    pub ingredient_id: Uuid,
    pub name: String,
    pub unit: String,
    pub vendor: Option<String>,
    pub area: Option<String>,
    pub on_hand: Decimal,
}

impl OnHand {
    fn new(ingredient: Ingredient, on_hand: Decimal) -> Self {
        Self {
            ingredient_id: ingredient.id,
            name: ingredient.name,
            unit: ingredient.unit,
            vendor: ingredient.vendor,
            area: ingredient.area,
            on_hand,
        }
    }
}

/// Input for a quick usage or waste entry
#[derive(Debug, Deserialize)]
pub struct RecordUsageInput {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub reason: UsageReason,
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// On-hand for a known ingredient
    pub async fn on_hand(&self, ingredient_id: Uuid) -> AppResult<OnHand> {
        let ingredient = self
            .store
            .get_ingredient(ingredient_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;
        let on_hand = self.store.get_on_hand(ingredient_id).await?;
        Ok(OnHand::new(ingredient, on_hand))
    }

    /// On-hand for every ingredient, ordered by name
    pub async fn on_hand_all(&self) -> AppResult<Vec<OnHand>> {
        let ingredients = self.store.list_ingredients().await?;
        let totals = self.store.get_on_hand_all().await?;

        Ok(ingredients
            .into_iter()
            .map(|i| {
                let on_hand = totals.get(&i.id).copied().unwrap_or(Decimal::ZERO);
                OnHand::new(i, on_hand)
            })
            .collect())
    }

    /// Movement history for a known ingredient
    pub async fn movements(&self, ingredient_id: Uuid) -> AppResult<Vec<Movement>> {
        if self.store.get_ingredient(ingredient_id).await?.is_none() {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }
        self.store.list_movements(ingredient_id).await
    }

    /// Post a movement as given (receiving, manual corrections)
    pub async fn record_movement(&self, input: NewMovement) -> AppResult<Movement> {
        let movement = self.store.append_movement(input).await?;
        tracing::info!(
            "Recorded {} {} for {} ({})",
            movement.direction,
            movement.quantity,
            movement.ingredient_id,
            movement.source
        );
        Ok(movement)
    }

    /// Post stock used in production or thrown away
    pub async fn record_usage(&self, input: RecordUsageInput) -> AppResult<Movement> {
        self.record_movement(NewMovement::new(
            input.ingredient_id,
            Direction::Out,
            input.quantity,
            input.reason.as_source(),
        ))
        .await
    }
}
