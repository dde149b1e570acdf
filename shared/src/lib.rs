//! Shared types and calculators for the pantry ledger
//!
//! This crate holds the pure parts of the engine: the data model, the
//! reconciliation arithmetic and the par/order-planning calculator. The
//! backend and the WASM bindings both build on it.

pub mod models;
pub mod planning;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use models::*;
pub use planning::*;
pub use reconcile::*;
pub use types::*;
pub use validation::*;
