//! HTTP handlers for physical counts

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::reconciliation::{
    BatchCountInput, BatchReconcileResult, CountEntry, ReconcileResult,
};
use crate::AppState;

/// Reconcile one ingredient to an observed count
pub async fn reconcile_count(
    State(state): State<AppState>,
    Json(input): Json<CountEntry>,
) -> AppResult<Json<ReconcileResult>> {
    let result = state
        .reconciliation()
        .reconcile(input.ingredient_id, input.observed_quantity)
        .await?;
    Ok(Json(result))
}

/// Reconcile a whole count sheet; items succeed or fail independently
pub async fn reconcile_batch(
    State(state): State<AppState>,
    Json(input): Json<BatchCountInput>,
) -> Json<BatchReconcileResult> {
    Json(state.reconciliation().reconcile_many(input.counts).await)
}
