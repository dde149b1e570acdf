//! Pantry ledger backend
//!
//! Ingredient stock derived from an append-only movement ledger, physical
//! count reconciliation and par-based order planning, served over HTTP.

use std::sync::Arc;

use axum::{routing::get, Router};
use shared::PlanningPolicy;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::{Config, ReconcileMode};
pub use error::{AppError, AppResult};

use services::{IngredientService, LedgerService, PlanningService, ReconciliationService};
use store::LedgerStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub reconcile_mode: ReconcileMode,
    pub planning_policy: PlanningPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        reconcile_mode: ReconcileMode,
        planning_policy: PlanningPolicy,
    ) -> Self {
        Self {
            store,
            reconcile_mode,
            planning_policy,
        }
    }

    pub fn from_config(store: Arc<dyn LedgerStore>, config: &Config) -> Self {
        Self::new(store, config.reconcile.mode, config.planning.policy())
    }

    pub fn ingredients(&self) -> IngredientService {
        IngredientService::new(self.store.clone())
    }

    pub fn ledger(&self) -> LedgerService {
        LedgerService::new(self.store.clone())
    }

    pub fn reconciliation(&self) -> ReconciliationService {
        ReconciliationService::new(self.store.clone(), self.reconcile_mode)
    }

    pub fn planning(&self) -> PlanningService {
        PlanningService::new(self.store.clone(), self.planning_policy)
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Pantry Ledger API v1"
}
