//! Order planning service

use std::sync::Arc;

use shared::{OrderPlan, PlanningPolicy, VendorFilter};

use crate::error::AppResult;
use crate::store::LedgerStore;

#[derive(Clone)]
pub struct PlanningService {
    store: Arc<dyn LedgerStore>,
    policy: PlanningPolicy,
}

impl PlanningService {
    /// Create a new PlanningService instance
    pub fn new(store: Arc<dyn LedgerStore>, policy: PlanningPolicy) -> Self {
        Self { store, policy }
    }

    /// Par, on-hand and reorder quantity for every ingredient matching `filter`
    pub async fn plan(&self, filter: &VendorFilter) -> AppResult<OrderPlan> {
        let ingredients = self.store.list_ingredients().await?;
        let on_hand = self.store.get_on_hand_all().await?;

        let plan = self.policy.build_plan(&ingredients, &on_hand, filter)?;
        tracing::debug!(
            "Order plan for vendor {}: {} line(s), total {}",
            filter,
            plan.lines.len(),
            plan.total_cost
        );
        Ok(plan)
    }
}
