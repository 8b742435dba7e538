//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Browser                     Rust Backend                               │
//! │  ───────                     ────────────                               │
//! │                                                                         │
//! │  POST apply_target_total { target: "150,00", basis: "gross" }           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, ApiError>                          │  │
//! │  │         │                                                        │  │
//! │  │  Unparsable?   ─── AllocationError::InvalidTarget ──────┐        │  │
//! │  │  Too high?     ─── AllocationError::TargetAbove... ─────┤        │  │
//! │  │  Unknown line? ─── CoreError::LineNotFound ─────────────┼─► ApiError
//! │  │  Bad config?   ─── ConfigError ─────────────────────────┘        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "TARGET_ABOVE_CURRENT_TOTAL",                                │
//! │    "message": "Target 200.00 is above the current total 184.50" }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use detailing_core::{AllocationError, CoreError, ValidationError};

/// API error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Line not found: 550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Line not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Allocation target non-positive or unparsable (400)
    InvalidTarget,

    /// Allocation would need a surcharge (422)
    TargetAboveCurrentTotal,

    /// Allocation would need more than a 100% discount (422)
    TargetBelowZeroAfterDiscount,

    /// Cart operation failed
    CartError,

    /// Configuration could not be loaded or saved
    ConfigError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts allocator refusals; each kind keeps its own code.
impl From<AllocationError> for ApiError {
    fn from(err: AllocationError) -> Self {
        let code = match &err {
            AllocationError::InvalidTarget(_) => ErrorCode::InvalidTarget,
            AllocationError::TargetAboveCurrentTotal { .. } => ErrorCode::TargetAboveCurrentTotal,
            AllocationError::TargetBelowZeroAfterDiscount { .. } => {
                ErrorCode::TargetBelowZeroAfterDiscount
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound(id) => ApiError::not_found("Line", &id),
            CoreError::CartTooLarge { max } => ApiError::cart(format!(
                "Cart cannot have more than {} lines",
                max
            )),
            CoreError::Validation(e) => e.into(),
            CoreError::Allocation(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading, validating, or saving `ConsoleConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use detailing_core::Money;

    #[test]
    fn test_allocation_errors_keep_their_codes() {
        let err: ApiError = AllocationError::TargetAboveCurrentTotal {
            target: Money::from_cents(20000),
            current: Money::from_cents(18450),
        }
        .into();
        assert_eq!(err.code, ErrorCode::TargetAboveCurrentTotal);

        let err: ApiError = CoreError::Allocation(AllocationError::InvalidTarget("0".into())).into();
        assert_eq!(err.code, ErrorCode::InvalidTarget);
    }

    #[test]
    fn test_core_errors_map_to_codes() {
        let err: ApiError = CoreError::LineNotFound("abc".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Line not found: abc");

        let err: ApiError = CoreError::CartTooLarge { max: 5 }.into();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("name is required");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "name is required");

        let err: ApiError = AllocationError::TargetBelowZeroAfterDiscount {
            target: Money::from_cents(1),
            current: Money::from_cents(0),
        }
        .into();
        assert_eq!(
            serde_json::to_value(&err).unwrap()["code"],
            "TARGET_BELOW_ZERO_AFTER_DISCOUNT"
        );
    }
}
