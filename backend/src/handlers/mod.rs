//! HTTP handlers for the pantry ledger API

mod health;
mod ingredients;
mod ledger;
mod planning;
mod reconcile;

pub use health::*;
pub use ingredients::*;
pub use ledger::*;
pub use planning::*;
pub use reconcile::*;
