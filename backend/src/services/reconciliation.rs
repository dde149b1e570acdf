//! Reconciliation service: turns physical counts into ledger adjustments

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    adjustment_for, checked_total, normalize_quantity, sources, validate_observed_quantity,
    Movement, NewMovement,
};
use uuid::Uuid;

use crate::config::ReconcileMode;
use crate::error::{AppError, AppResult};
use crate::store::LedgerStore;

/// Reconciliation service posting the minimal corrective movement per count
#[derive(Clone)]
pub struct ReconciliationService {
    store: Arc<dyn LedgerStore>,
    mode: ReconcileMode,
}

/// One observed count
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountEntry {
    pub ingredient_id: Uuid,
    pub observed_quantity: Decimal,
}

/// Batch of observed counts
#[derive(Debug, Deserialize)]
pub struct BatchCountInput {
    pub counts: Vec<CountEntry>,
}

/// Result of reconciling one ingredient
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResult {
    pub ingredient_id: Uuid,
    pub previous_on_hand: Decimal,
    pub on_hand: Decimal,
    /// Number of movements written (0 or 1)
    pub posted: usize,
    pub movement: Option<Movement>,
}

/// Per-item outcome inside a batch
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Posted { movement: Movement },
    Unchanged,
    Failed { code: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub ingredient_id: Uuid,
    pub observed_quantity: Decimal,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Result of a batch count
#[derive(Debug, Clone, Serialize)]
pub struct BatchReconcileResult {
    pub posted: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

impl ReconciliationService {
    /// Create a new ReconciliationService instance
    pub fn new(store: Arc<dyn LedgerStore>, mode: ReconcileMode) -> Self {
        Self { store, mode }
    }

    pub fn mode(&self) -> ReconcileMode {
        self.mode
    }

    /// Bring the ingredient's derived on-hand to `observed_quantity`.
    ///
    /// Posts nothing when the ledger already agrees. In guarded mode the
    /// write is conditional on the on-hand value read here; if another
    /// writer got in between, nothing is written and the call fails with
    /// `ConcurrentModification`.
    pub async fn reconcile(
        &self,
        ingredient_id: Uuid,
        observed_quantity: Decimal,
    ) -> AppResult<ReconcileResult> {
        validate_observed_quantity(observed_quantity)
            .map_err(|msg| AppError::validation("observed_quantity", msg))?;
        let observed = normalize_quantity(observed_quantity);

        if self.store.get_ingredient(ingredient_id).await?.is_none() {
            return Err(AppError::unknown_ingredient(ingredient_id));
        }

        let current = self.store.get_on_hand(ingredient_id).await?;

        let Some(adjustment) = adjustment_for(current, observed)? else {
            tracing::debug!(
                "Count for {} matches on-hand {}, nothing to post",
                ingredient_id,
                current
            );
            return Ok(ReconcileResult {
                ingredient_id,
                previous_on_hand: current,
                on_hand: current,
                posted: 0,
                movement: None,
            });
        };

        let new_movement = NewMovement::new(
            ingredient_id,
            adjustment.direction,
            adjustment.quantity,
            sources::ADJUSTMENT,
        );

        let movement = match self.mode {
            ReconcileMode::Guarded => self
                .store
                .append_movement_if_on_hand(new_movement, current)
                .await?
                .ok_or_else(|| {
                    tracing::warn!(
                        "On-hand for {} moved away from {} during reconciliation",
                        ingredient_id,
                        current
                    );
                    AppError::ConcurrentModification { ingredient_id }
                })?,
            ReconcileMode::Unguarded => self.store.append_movement(new_movement).await?,
        };

        tracing::info!(
            "Posted adjustment {} {} for {} (on-hand {} -> {})",
            movement.direction,
            movement.quantity,
            ingredient_id,
            current,
            observed
        );

        Ok(ReconcileResult {
            ingredient_id,
            previous_on_hand: current,
            on_hand: checked_total(current, movement.signed_quantity())?,
            posted: 1,
            movement: Some(movement),
        })
    }

    /// Reconcile every count independently, in order.
    ///
    /// A failing item is reported in its result and does not stop the batch.
    pub async fn reconcile_many(&self, counts: Vec<CountEntry>) -> BatchReconcileResult {
        let mut results = Vec::with_capacity(counts.len());

        for count in counts {
            let outcome = match self.reconcile(count.ingredient_id, count.observed_quantity).await {
                Ok(ReconcileResult {
                    movement: Some(movement),
                    ..
                }) => ItemOutcome::Posted { movement },
                Ok(_) => ItemOutcome::Unchanged,
                Err(err) => {
                    tracing::warn!("Count for {} not applied: {}", count.ingredient_id, err);
                    ItemOutcome::Failed {
                        code: err.code().to_string(),
                        message: err.public_message(),
                    }
                }
            };

            results.push(BatchItemResult {
                ingredient_id: count.ingredient_id,
                observed_quantity: count.observed_quantity,
                outcome,
            });
        }

        let posted = results
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Posted { .. }))
            .count();
        let failed = results
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Failed { .. }))
            .count();

        tracing::info!(
            "Batch count: {} item(s), {} posted, {} failed",
            results.len(),
            posted,
            failed
        );

        BatchReconcileResult {
            posted,
            failed,
            results,
        }
    }
}
