//! HTTP handlers for order planning

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{OrderPlan, VendorFilter};

use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    /// Exact vendor name, or "all"
    pub vendor: Option<String>,
}

/// Order plan filtered by vendor
pub async fn get_order_plan(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> AppResult<Json<OrderPlan>> {
    let filter = VendorFilter::parse(query.vendor.as_deref());
    let plan = state.planning().plan(&filter).await?;
    Ok(Json(plan))
}
