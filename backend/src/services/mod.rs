//! Business logic services for the pantry ledger

pub mod ingredient;
pub mod ledger;
pub mod planning;
pub mod reconciliation;

pub use ingredient::IngredientService;
pub use ledger::LedgerService;
pub use planning::PlanningService;
pub use reconciliation::ReconciliationService;
