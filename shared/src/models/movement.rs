//! Ledger movements
//!
//! A movement is one immutable stock change. The sign lives in the
//! direction; quantities are always positive magnitudes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Source tags written by the engine and the kiosk
pub mod sources {
    /// Correction posted by reconciliation
    pub const ADJUSTMENT: &str = "adjustment";
    /// Goods received
    pub const RECEIVING: &str = "in";
    pub const PRODUCTION: &str = "production";
    pub const WASTE: &str = "waste";
    pub const MANUAL_ADJUSTMENT: &str = "manual adjustment";
}

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Apply the direction's sign to a magnitude
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        match self {
            Direction::In => quantity,
            Direction::Out => -quantity,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown movement direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// A ledger entry as persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub direction: Direction,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub source: String,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    pub fn signed_quantity(&self) -> Decimal {
        self.direction.signed(self.quantity)
    }
}

/// A movement waiting to be appended
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NewMovement {
    pub ingredient_id: Uuid,
    pub direction: Direction,
    pub quantity: Decimal,
    pub source: String,
    #[serde(default)]
    pub unit_cost: Option<Decimal>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl NewMovement {
    pub fn new(
        ingredient_id: Uuid,
        direction: Direction,
        quantity: Decimal,
        source: impl Into<String>,
    ) -> Self {
        Self {
            ingredient_id,
            direction,
            quantity,
            source: source.into(),
            unit_cost: None,
            reference: None,
        }
    }

    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Why stock left the shelf outside of a count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageReason {
    Production,
    Waste,
}

impl UsageReason {
    pub fn as_source(&self) -> &'static str {
        match self {
            UsageReason::Production => sources::PRODUCTION,
            UsageReason::Waste => sources::WASTE,
        }
    }
}
