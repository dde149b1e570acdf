//! Validation utilities for ledger input

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::reconcile::MAX_QUANTITY;

// ============================================================================
// Quantity Validations
// ============================================================================

/// Validate a movement magnitude: direction carries the sign, so the
/// quantity itself must be strictly positive
pub fn validate_movement_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    if quantity.is_zero() {
        return Err("Quantity must be greater than zero");
    }
    if quantity > MAX_QUANTITY {
        return Err("Quantity exceeds the ledger maximum");
    }
    Ok(())
}

/// Validate a physically observed count
pub fn validate_observed_quantity(observed: Decimal) -> Result<(), &'static str> {
    if observed < Decimal::ZERO {
        return Err("Observed quantity cannot be negative");
    }
    if observed > MAX_QUANTITY {
        return Err("Observed quantity exceeds the ledger maximum");
    }
    Ok(())
}

/// Validate usage, par and cost figures
pub fn validate_non_negative(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Value cannot be negative");
    }
    if value > MAX_QUANTITY {
        return Err("Value exceeds the ledger maximum");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a required display name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    if name.len() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

// ============================================================================
// validator hooks
// ============================================================================

pub(crate) fn check_name(name: &str) -> Result<(), ValidationError> {
    validate_name(name).map_err(|msg| with_message("name", msg))
}

pub(crate) fn check_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value).map_err(|msg| with_message("non_negative", msg))
}

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_quantity() {
        assert!(validate_movement_quantity(Decimal::from(3)).is_ok());
        assert!(validate_movement_quantity(Decimal::new(1, 4)).is_ok());
        assert_eq!(
            validate_movement_quantity(Decimal::from(-5)),
            Err("Quantity cannot be negative")
        );
        assert_eq!(
            validate_movement_quantity(Decimal::ZERO),
            Err("Quantity must be greater than zero")
        );
    }

    #[test]
    fn test_observed_quantity_allows_zero() {
        assert!(validate_observed_quantity(Decimal::ZERO).is_ok());
        assert!(validate_observed_quantity(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_ledger_maximum() {
        let over = MAX_QUANTITY + Decimal::new(1, 4);

        assert!(validate_movement_quantity(MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_movement_quantity(over),
            Err("Quantity exceeds the ledger maximum")
        );
        // Would round up past the maximum at ledger scale
        assert!(validate_movement_quantity(MAX_QUANTITY + Decimal::new(5, 5)).is_err());

        assert!(validate_observed_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_observed_quantity(over).is_err());
        assert!(validate_non_negative(over).is_err());
        assert!(check_non_negative(&Decimal::MAX).is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Flour").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_check_non_negative_sets_message() {
        let err = check_non_negative(&Decimal::from(-2)).unwrap_err();
        assert_eq!(err.code, "non_negative");
        assert_eq!(err.message.as_deref(), Some("Value cannot be negative"));
    }
}
