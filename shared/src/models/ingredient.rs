//! Ingredient master records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{check_name, check_non_negative};

/// An ingredient tracked by the ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    /// Display only, never used in arithmetic
    pub unit: String,
    pub vendor: Option<String>,
    pub area: Option<String>,
    pub weekly_usage: Decimal,
    /// Zero or absent means the par formula applies
    pub par_override: Option<Decimal>,
    pub cost_per_unit: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    /// Vendor with blank names treated as unassigned
    pub fn vendor_key(&self) -> Option<&str> {
        self.vendor
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Storage area with blank names treated as unassigned
    pub fn area_key(&self) -> Option<&str> {
        self.area.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }
}

/// Input for registering an ingredient
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewIngredient {
    #[validate(custom = "check_name")]
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub vendor: Option<String>,
    pub area: Option<String>,
    #[serde(default)]
    #[validate(custom = "check_non_negative")]
    pub weekly_usage: Decimal,
    #[validate(custom = "check_non_negative")]
    pub par_override: Option<Decimal>,
    #[validate(custom = "check_non_negative")]
    pub cost_per_unit: Option<Decimal>,
}

impl NewIngredient {
    pub fn named(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            vendor: None,
            area: None,
            weekly_usage: Decimal::ZERO,
            par_override: None,
            cost_per_unit: None,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_weekly_usage(mut self, weekly_usage: Decimal) -> Self {
        self.weekly_usage = weekly_usage;
        self
    }

    pub fn with_cost_per_unit(mut self, cost: Decimal) -> Self {
        self.cost_per_unit = Some(cost);
        self
    }

    /// Trim text fields and collapse blank optional fields to `None`
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            unit: self.unit.trim().to_string(),
            vendor: blank_to_none(self.vendor),
            area: blank_to_none(self.area),
            ..self
        }
    }
}

/// Administrative update of the usage-driven planning fields
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UsageAndParUpdate {
    #[validate(custom = "check_non_negative")]
    pub weekly_usage: Decimal,
    #[validate(custom = "check_non_negative")]
    pub par_override: Option<Decimal>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_collapses_blank_vendor() {
        let input = NewIngredient {
            vendor: Some("   ".to_string()),
            area: Some(" Kitchen ".to_string()),
            ..NewIngredient::named("  Flour ", "lb")
        }
        .normalized();

        assert_eq!(input.name, "Flour");
        assert_eq!(input.vendor, None);
        assert_eq!(input.area.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let input = NewIngredient::named("  ", "lb");
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_usage() {
        let input = NewIngredient::named("Sugar", "lb").with_weekly_usage(Decimal::from(-1));
        assert!(input.validate().is_err());

        let update = UsageAndParUpdate {
            weekly_usage: Decimal::from(10),
            par_override: Some(Decimal::from(-3)),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        let input = NewIngredient::named("Sugar", "lb")
            .with_vendor("Bakemark")
            .with_weekly_usage(Decimal::from(14))
            .with_cost_per_unit(Decimal::new(125, 2));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_values_over_ledger_maximum() {
        let huge = Decimal::from(70_000_000_000i64);
        let input = NewIngredient::named("Sugar", "lb").with_weekly_usage(huge);
        assert!(input.validate().is_err());

        let update = UsageAndParUpdate {
            weekly_usage: huge,
            par_override: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_area_key_ignores_blank() {
        let ingredient = Ingredient {
            id: Uuid::nil(),
            name: "Flour".to_string(),
            unit: "lb".to_string(),
            vendor: None,
            area: Some("  ".to_string()),
            weekly_usage: Decimal::ZERO,
            par_override: None,
            cost_per_unit: None,
            created_at: Utc::now(),
        };
        assert_eq!(ingredient.area_key(), None);

        let stocked = Ingredient {
            area: Some(" Walk-in ".to_string()),
            ..ingredient
        };
        assert_eq!(stocked.area_key(), Some("Walk-in"));
    }
}
