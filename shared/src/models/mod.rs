//! Domain models for the pantry ledger

mod ingredient;
mod movement;
mod planning;

pub use ingredient::*;
pub use movement::*;
pub use planning::*;
