//! # Validation Module
//!
//! Input validation utilities for AESCOMPT.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms                                                     │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: AppStore mutation methods (Rust)                             │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Integrity scrubber at startup                                │
//! │  └── Shape validation of everything already persisted                  │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_TEXT_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a name or free-text label.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_TEXT_LEN`] characters
///
/// ## Example
/// ```rust
/// use aescompt_core::validation::validate_text;
///
/// assert!(validate_text("name", "Sucre 1kg").is_ok());
/// assert!(validate_text("name", "   ").is_err());
/// ```
pub fn validate_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Monetary Validators
// =============================================================================

/// Validates a transaction or price amount.
///
/// ## Rules
/// - Must not be negative
/// - Zero is allowed (free items, zero-amount corrections)
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a payment or repayment amount.
///
/// ## Rules
/// - Must be strictly positive; paying zero or negative francs is
///   always a data-entry mistake
pub fn validate_payment(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock quantity.
///
/// ## Rules
/// - Must not be negative (stock is set to an absolute count, and a
///   physical count can never be below zero)
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("name", "Sucre 1kg").is_ok());
        assert!(validate_text("name", "").is_err());
        assert!(validate_text("name", "   ").is_err());
        assert!(validate_text("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("amount", Money::from_francs(0)).is_ok());
        assert!(validate_amount("amount", Money::from_francs(2500)).is_ok());
        assert!(validate_amount("amount", Money::from_francs(-1)).is_err());
    }

    #[test]
    fn test_validate_payment() {
        assert!(validate_payment("payment", Money::from_francs(100)).is_ok());
        assert!(validate_payment("payment", Money::zero()).is_err());
        assert!(validate_payment("payment", Money::from_francs(-100)).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(42).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }
}
