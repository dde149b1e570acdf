//! Ingredient directory service

use std::collections::BTreeSet;
use std::sync::Arc;

use shared::{Ingredient, NewIngredient, UsageAndParUpdate};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::LedgerStore;

#[derive(Clone)]
pub struct IngredientService {
    store: Arc<dyn LedgerStore>,
}

impl IngredientService {
    /// Create a new IngredientService instance
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Register an ingredient
    pub async fn create(&self, input: NewIngredient) -> AppResult<Ingredient> {
        input.validate()?;
        let ingredient = self.store.create_ingredient(input).await?;
        tracing::info!("Created ingredient {} ({})", ingredient.name, ingredient.id);
        Ok(ingredient)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Ingredient> {
        self.store
            .get_ingredient(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<Ingredient>> {
        self.store.list_ingredients().await
    }

    /// Distinct, non-blank vendor names in sorted order
    pub async fn vendors(&self) -> AppResult<Vec<String>> {
        let ingredients = self.store.list_ingredients().await?;
        let vendors: BTreeSet<String> = ingredients
            .iter()
            .filter_map(|i| i.vendor_key().map(str::to_string))
            .collect();
        Ok(vendors.into_iter().collect())
    }

    /// Distinct, non-blank storage areas in sorted order
    pub async fn areas(&self) -> AppResult<Vec<String>> {
        let ingredients = self.store.list_ingredients().await?;
        let areas: BTreeSet<String> = ingredients
            .iter()
            .filter_map(|i| i.area_key().map(str::to_string))
            .collect();
        Ok(areas.into_iter().collect())
    }

    /// Update weekly usage and the manual par override
    pub async fn set_usage_and_par(
        &self,
        id: Uuid,
        input: UsageAndParUpdate,
    ) -> AppResult<Ingredient> {
        input.validate()?;
        let ingredient = self
            .store
            .set_usage_and_par(id, input.weekly_usage, input.par_override)
            .await?;
        tracing::info!(
            "Updated usage for {}: weekly {} par override {:?}",
            ingredient.name,
            ingredient.weekly_usage,
            ingredient.par_override
        );
        Ok(ingredient)
    }
}
