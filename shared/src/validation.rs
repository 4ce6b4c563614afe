//! Validation utilities for the RMC inventory
//!
//! The reporting engine never rejects data; these checks run at the data-entry
//! boundary before a mutation is forwarded upstream.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::{MaterialInput, MAX_RATING};

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate that the minimum stock level does not exceed the maximum
pub fn validate_stock_levels(min: Decimal, max: Decimal) -> Result<(), &'static str> {
    if min < Decimal::ZERO || max < Decimal::ZERO {
        return Err("Stock levels cannot be negative");
    }
    if min > max {
        return Err("Minimum stock level cannot exceed maximum stock level");
    }
    Ok(())
}

/// Validate a supplier rating is within 0-5
pub fn validate_rating_range(rating: Decimal) -> Result<(), &'static str> {
    if rating < Decimal::ZERO || rating > Decimal::from(MAX_RATING) {
        return Err("Rating must be between 0 and 5");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

// ============================================================================
// `validator` derive hooks
// ============================================================================

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(validation_error("non_negative", "Value cannot be negative"));
    }
    Ok(())
}

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(validation_error("positive", "Quantity must be greater than zero"));
    }
    Ok(())
}

pub fn validate_rating(value: &Decimal) -> Result<(), ValidationError> {
    validate_rating_range(*value).map_err(|message| validation_error("rating", message))
}

pub fn validate_stock_levels_input(input: &MaterialInput) -> Result<(), ValidationError> {
    let max = match input.max_stock_level {
        Some(max) => max,
        None => input.min_stock_level.checked_mul(Decimal::TWO).ok_or_else(|| {
            validation_error("stock_levels", "Minimum stock level is out of range")
        })?,
    };
    validate_stock_levels(input.min_stock_level, max)
        .map_err(|message| validation_error("stock_levels", message))
}
