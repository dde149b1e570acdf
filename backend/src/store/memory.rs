//! Process-local ledger store
//!
//! Keeps the directory and the movement log behind one lock. On-hand is
//! folded from the full log on every read.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::{checked_total, on_hand_from, Ingredient, Movement, NewIngredient, NewMovement};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_usage_and_par, prepare_ingredient, prepare_movement, LedgerStore};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    state: RwLock<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    ingredients: HashMap<Uuid, Ingredient>,
    movements: Vec<Movement>,
}

impl LedgerState {
    fn on_hand(&self, ingredient_id: Uuid) -> AppResult<Decimal> {
        let on_hand = on_hand_from(
            self.movements
                .iter()
                .filter(|m| m.ingredient_id == ingredient_id),
        )?;
        Ok(on_hand)
    }

    fn push(&mut self, movement: NewMovement) -> AppResult<Movement> {
        if !self.ingredients.contains_key(&movement.ingredient_id) {
            return Err(AppError::unknown_ingredient(movement.ingredient_id));
        }

        let movement = Movement {
            id: Uuid::new_v4(),
            ingredient_id: movement.ingredient_id,
            direction: movement.direction,
            quantity: movement.quantity,
            unit_cost: movement.unit_cost,
            source: movement.source,
            reference: movement.reference,
            created_at: Utc::now(),
        };
        self.movements.push(movement.clone());
        Ok(movement)
    }
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of movements across all ingredients
    pub async fn movement_count(&self) -> usize {
        self.state.read().await.movements.len()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn create_ingredient(&self, input: NewIngredient) -> AppResult<Ingredient> {
        let input = prepare_ingredient(input)?;
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name: input.name,
            unit: input.unit,
            vendor: input.vendor,
            area: input.area,
            weekly_usage: input.weekly_usage,
            par_override: input.par_override,
            cost_per_unit: input.cost_per_unit,
            created_at: Utc::now(),
        };

        self.state
            .write()
            .await
            .ingredients
            .insert(ingredient.id, ingredient.clone());
        Ok(ingredient)
    }

    async fn get_ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>> {
        Ok(self.state.read().await.ingredients.get(&id).cloned())
    }

    async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let mut ingredients: Vec<Ingredient> =
            self.state.read().await.ingredients.values().cloned().collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(ingredients)
    }

    async fn set_usage_and_par(
        &self,
        id: Uuid,
        weekly_usage: Decimal,
        par_override: Option<Decimal>,
    ) -> AppResult<Ingredient> {
        check_usage_and_par(weekly_usage, par_override)?;
        let mut state = self.state.write().await;
        let ingredient = state
            .ingredients
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        ingredient.weekly_usage = weekly_usage;
        ingredient.par_override = par_override;
        Ok(ingredient.clone())
    }

    async fn get_on_hand(&self, ingredient_id: Uuid) -> AppResult<Decimal> {
        self.state.read().await.on_hand(ingredient_id)
    }

    async fn get_on_hand_all(&self) -> AppResult<HashMap<Uuid, Decimal>> {
        let state = self.state.read().await;
        let mut totals: HashMap<Uuid, Decimal> = state
            .ingredients
            .keys()
            .map(|id| (*id, Decimal::ZERO))
            .collect();

        for movement in &state.movements {
            let total = totals.entry(movement.ingredient_id).or_insert(Decimal::ZERO);
            *total = checked_total(*total, movement.signed_quantity())?;
        }
        Ok(totals)
    }

    async fn list_movements(&self, ingredient_id: Uuid) -> AppResult<Vec<Movement>> {
        Ok(self
            .state
            .read()
            .await
            .movements
            .iter()
            .filter(|m| m.ingredient_id == ingredient_id)
            .cloned()
            .collect())
    }

    async fn append_movement(&self, movement: NewMovement) -> AppResult<Movement> {
        let movement = prepare_movement(movement)?;
        self.state.write().await.push(movement)
    }

    async fn append_movement_if_on_hand(
        &self,
        movement: NewMovement,
        expected_on_hand: Decimal,
    ) -> AppResult<Option<Movement>> {
        let movement = prepare_movement(movement)?;
        let mut state = self.state.write().await;

        if !state.ingredients.contains_key(&movement.ingredient_id) {
            return Err(AppError::unknown_ingredient(movement.ingredient_id));
        }
        if state.on_hand(movement.ingredient_id)? != expected_on_hand {
            return Ok(None);
        }
        state.push(movement).map(Some)
    }
}
