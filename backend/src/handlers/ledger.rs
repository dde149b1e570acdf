//! HTTP handlers for stock levels and movements

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{Movement, NewMovement};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ledger::{OnHand, RecordUsageInput};
use crate::AppState;

/// On-hand for every ingredient
pub async fn list_on_hand(State(state): State<AppState>) -> AppResult<Json<Vec<OnHand>>> {
    let on_hand = state.ledger().on_hand_all().await?;
    Ok(Json(on_hand))
}

/// On-hand for one ingredient
pub async fn get_on_hand(
    State(state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<OnHand>> {
    let on_hand = state.ledger().on_hand(ingredient_id).await?;
    Ok(Json(on_hand))
}

/// Movement history for one ingredient
pub async fn list_movements(
    State(state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<Vec<Movement>>> {
    let movements = state.ledger().movements(ingredient_id).await?;
    Ok(Json(movements))
}

/// Append a movement
pub async fn record_movement(
    State(state): State<AppState>,
    Json(input): Json<NewMovement>,
) -> AppResult<Json<Movement>> {
    let movement = state.ledger().record_movement(input).await?;
    Ok(Json(movement))
}

/// Record production usage or waste
pub async fn record_usage(
    State(state): State<AppState>,
    Json(input): Json<RecordUsageInput>,
) -> AppResult<Json<Movement>> {
    let movement = state.ledger().record_usage(input).await?;
    Ok(Json(movement))
}
