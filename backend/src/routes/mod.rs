//! Route definitions for the pantry ledger API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ingredient directory
        .nest("/ingredients", ingredient_routes())
        // Stock levels and movements
        .nest("/ledger", ledger_routes())
        // Physical counts
        .nest("/reconcile", reconcile_routes())
        // Order planning
        .route("/planning", get(handlers::get_order_plan))
}

/// Ingredient directory routes
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_ingredients).post(handlers::create_ingredient),
        )
        .route("/vendors", get(handlers::list_vendors))
        .route("/areas", get(handlers::list_areas))
        .route("/:ingredient_id", get(handlers::get_ingredient))
        .route("/:ingredient_id/usage", put(handlers::set_usage_and_par))
}

/// Ledger routes
fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route("/on-hand", get(handlers::list_on_hand))
        .route("/on-hand/:ingredient_id", get(handlers::get_on_hand))
        .route("/movements", post(handlers::record_movement))
        .route("/usage", post(handlers::record_usage))
        .route("/:ingredient_id/movements", get(handlers::list_movements))
}

/// Reconciliation routes
fn reconcile_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::reconcile_count))
        .route("/batch", post(handlers::reconcile_batch))
}
