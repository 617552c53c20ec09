//! # Error Types
//!
//! Domain-specific error types for aescompt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  aescompt-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  aescompt-store errors (separate crate)                                │
//! │  └── StoreError       - Persistence failures, corruption               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ID, field name, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic
/// failures. They should be caught and translated to user-facing
/// messages by the presentation layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the inventory collection.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Debt cannot be found in the debts collection.
    #[error("Debt not found: {0}")]
    DebtNotFound(String),

    /// Supplier cannot be found in the suppliers collection.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// An operation requiring a signed-in profile ran without one.
    ///
    /// ## When This Occurs
    /// - Settings mutations before the authentication flow has created
    ///   the singleton profile
    #[error("No user profile: not signed in")]
    NotSignedIn,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DebtNotFound("d-42".to_string());
        assert_eq!(err.to_string(), "Debt not found: d-42");

        let err = CoreError::NotSignedIn;
        assert_eq!(err.to_string(), "No user profile: not signed in");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustNotBeNegative {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "payment".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
