//! # Validation Module
//!
//! Input validation for everything the console hands to the engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser forms                                                │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Console commands (Rust)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing engine                                               │
//! │  └── Assumes valid input; clamps out-of-range results to zero          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use detailing_core::validation::{parse_money, validate_vat_rate_percent};
//!
//! assert_eq!(parse_money("120,50").unwrap().cents(), 12050);
//! assert!(validate_vat_rate_percent(23).is_ok());
//! ```

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::adjustment::Adjustment;
use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest note an operator may attach to a line.
pub const MAX_NOTE_LENGTH: usize = 500;

/// Longest service display name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest magnitude, in minor units, accepted for any entered amount.
///
/// A full cart of lines at this cap still sums far inside `i64`.
pub const MAX_AMOUNT: i64 = 100_000_000_000;

/// Largest magnitude accepted for a percent adjustment (10000%).
pub const MAX_PERCENT_BPS: i64 = 1_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a service display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_service_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a catalog service reference.
pub fn validate_service_id(service_id: &str) -> ValidationResult<()> {
    if service_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "service_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a line note and normalizes blank notes to `None`.
pub fn validate_note(note: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LENGTH,
        });
    }

    Ok(Some(note.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a base net price. Zero is allowed (complimentary services).
///
/// ```rust
/// use detailing_core::money::Money;
/// use detailing_core::validation::{validate_base_price, MAX_AMOUNT};
///
/// assert!(validate_base_price(Money::from_cents(0)).is_ok());
/// assert!(validate_base_price(Money::from_cents(-100)).is_err());
/// assert!(validate_base_price(Money::from_cents(MAX_AMOUNT + 1)).is_err());
/// ```
pub fn validate_base_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: "base_price_net".to_string(),
            min: 0,
            max: MAX_AMOUNT,
        });
    }

    Ok(())
}

/// Validates a VAT rate in whole percent (0–100).
pub fn validate_vat_rate_percent(percent: u32) -> ValidationResult<()> {
    if percent > 100 {
        return Err(ValidationError::OutOfRange {
            field: "vat_rate_percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates an operator-entered adjustment.
///
/// ## Rules
/// - `SetNet` / `SetGross` overrides must not be negative
/// - Percent and fixed amounts may carry either sign; the calculator
///   decides what the sign means and clamps the result
/// - Magnitudes are capped at [`MAX_PERCENT_BPS`] and [`MAX_AMOUNT`]
pub fn validate_adjustment(adjustment: &Adjustment) -> ValidationResult<()> {
    let (min, max) = match adjustment {
        Adjustment::Percent(_) => (-MAX_PERCENT_BPS, MAX_PERCENT_BPS),
        Adjustment::FixedNet(_) | Adjustment::FixedGross(_) => (-MAX_AMOUNT, MAX_AMOUNT),
        Adjustment::SetNet(_) | Adjustment::SetGross(_) => (0, MAX_AMOUNT),
    };

    let value = adjustment.value();
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: format!("{} value", adjustment.kind()),
            min,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Money Parsing
// =============================================================================

/// Parses an operator-typed decimal amount into minor units.
///
/// ## Accepted Input
/// - `.` or `,` as the decimal separator (`120.50`, `120,50`)
/// - spaces as thousands separators (`1 200,00`)
/// - at most two fractional digits
///
/// ## Example
/// ```rust
/// use detailing_core::validation::parse_money;
///
/// assert_eq!(parse_money("1 200,5").unwrap().cents(), 120050);
/// assert!(parse_money("12.345").is_err());
/// assert!(parse_money("twelve").is_err());
/// ```
pub fn parse_money(input: &str) -> ValidationResult<Money> {
    let normalized: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: "amount".to_string(),
        });
    }

    let decimal = Decimal::from_str(&normalized).map_err(|_| ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason: format!("'{}' is not a decimal number", input.trim()),
    })?;

    if decimal.scale() > 2 {
        return Err(ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "at most 2 decimal places are allowed".to_string(),
        });
    }

    let out_of_range = || ValidationError::OutOfRange {
        field: "amount".to_string(),
        min: -MAX_AMOUNT,
        max: MAX_AMOUNT,
    };

    let minor = (decimal * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(out_of_range)?;

    if minor.abs() > MAX_AMOUNT {
        return Err(out_of_range());
    }

    Ok(Money::from_cents(minor))
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a line ID (UUID format).
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
