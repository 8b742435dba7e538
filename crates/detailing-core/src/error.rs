//! # Error Types
//!
//! Domain-specific error types for detailing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  detailing-core errors (this file)                                     │
//! │  ├── CoreError        - Cart operations                                │
//! │  ├── AllocationError  - Target-total requests the allocator refuses    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  console errors (apps/console)                                         │
//! │  └── ApiError         - What the browser sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError / AllocationError → CoreError → ApiError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line ID, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every failure leaves the cart untouched

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Cart-level errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line with this ID is in the cart.
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Cart has reached its line limit.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),
}

// =============================================================================
// Allocation Error
// =============================================================================

/// Reasons the allocator refuses a target total.
///
/// ## User Workflow
/// ```text
/// Operator types "150,00" as the gross target, cart is 184.50 gross
///      │
///      ▼
/// apply_target_total(items, 15000, Gross)
///      │
///      ├── "abc" or "0"      → InvalidTarget
///      ├── target > 18450    → TargetAboveCurrentTotal (allocator never surcharges)
///      └── OK                → every line rewritten, cart hits 150.00 exactly
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Target is non-positive or could not be parsed.
    #[error("Invalid target amount: {0}")]
    InvalidTarget(String),

    /// Reaching the target would need a negative discount.
    #[error("Target {target} is above the current total {current}")]
    TargetAboveCurrentTotal { target: Money, current: Money },

    /// Reaching the target would need more than a 100% discount.
    ///
    /// Kept for callers matching on the full set of refusals; a positive
    /// target below the catalog total never needs more than 100%, so the
    /// allocator does not return it today.
    #[error("Target {target} would need more than a 100% discount on {current}")]
    TargetBelowZeroAfterDiscount { target: Money, current: Money },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before any pricing runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, unparsable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for allocator Results.
pub type AllocationResult<T> = Result<T, AllocationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_messages() {
        let err = AllocationError::TargetAboveCurrentTotal {
            target: Money::from_cents(20000),
            current: Money::from_cents(18450),
        };
        assert_eq!(err.to_string(), "Target 200.00 is above the current total 184.50");

        let err = AllocationError::InvalidTarget("must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid target amount: must be positive");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "vat_rate_percent".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "vat_rate_percent must be between 0 and 100");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = AllocationError::InvalidTarget("0".to_string()).into();
        assert!(matches!(core_err, CoreError::Allocation(_)));
    }
}
