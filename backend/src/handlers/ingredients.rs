//! HTTP handlers for the ingredient directory

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{Ingredient, NewIngredient, UsageAndParUpdate};
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// List all ingredients
pub async fn list_ingredients(State(state): State<AppState>) -> AppResult<Json<Vec<Ingredient>>> {
    let ingredients = state.ingredients().list().await?;
    Ok(Json(ingredients))
}

/// Register an ingredient
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(input): Json<NewIngredient>,
) -> AppResult<Json<Ingredient>> {
    let ingredient = state.ingredients().create(input).await?;
    Ok(Json(ingredient))
}

/// Get one ingredient
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<Ingredient>> {
    let ingredient = state.ingredients().get(ingredient_id).await?;
    Ok(Json(ingredient))
}

/// Update weekly usage and par override
pub async fn set_usage_and_par(
    State(state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
    Json(input): Json<UsageAndParUpdate>,
) -> AppResult<Json<Ingredient>> {
    let ingredient = state
        .ingredients()
        .set_usage_and_par(ingredient_id, input)
        .await?;
    Ok(Json(ingredient))
}

/// Distinct vendor names for the planning filter
pub async fn list_vendors(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let vendors = state.ingredients().vendors().await?;
    Ok(Json(vendors))
}

/// Distinct storage areas for count-sheet navigation
pub async fn list_areas(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let areas = state.ingredients().areas().await?;
    Ok(Json(areas))
}
