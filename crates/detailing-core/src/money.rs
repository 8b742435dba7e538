//! # Money Module
//!
//! Provides the `Money` type and the one rounding rule the engine uses.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE TWO-VIEWS PROBLEM                                                  │
//! │                                                                         │
//! │  The editable cart and the read-only summary both show line prices.    │
//! │  With floats, two recomputations can disagree in the last digit:       │
//! │    12300 * 0.3496 = 4300.079999999999  vs  4300.08                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + one rounding function              │
//! │    round_half_away(12300 * 3496, 10000) = 4300 (always)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use detailing_core::money::Money;
//!
//! let price = Money::from_cents(12300); // 123.00
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.cents(), 12800);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::VatRate;

// =============================================================================
// Rounding
// =============================================================================

/// Divides and rounds half away from zero.
///
/// `denominator` must be positive; every caller in the engine divides by a
/// constant (100, 10000), by `100 + vat`, or by a positive cart total.
///
/// ```text
///   round_half_away( 25, 10) =  3      2.5  →  3
///   round_half_away(-25, 10) = -3     -2.5  → -3
///   round_half_away( 24, 10) =  2      2.4  →  2
/// ```
#[inline]
pub const fn round_half_away(numerator: i128, denominator: i128) -> i128 {
    let magnitude = (2 * numerator.abs() + denominator) / (2 * denominator);
    if numerator < 0 {
        -magnitude
    } else {
        magnitude
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor currency units (grosze, cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: adjustment values and discounts can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a bare integer**: the browser receives `12300`, not `{...}`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use detailing_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Narrows a wide intermediate, saturating at the i64 bounds.
    #[inline]
    pub(crate) const fn saturating_from_wide(value: i128) -> Self {
        if value > i64::MAX as i128 {
            Money(i64::MAX)
        } else if value < i64::MIN as i128 {
            Money(i64::MIN)
        } else {
            Money(value as i64)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Clamps negative values to zero.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Calculates VAT on this (net) amount, rounded half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use detailing_core::money::Money;
    /// use detailing_core::types::VatRate;
    ///
    /// // 9000 × 23% = 2070
    /// let vat = Money::from_cents(9000).calculate_vat(VatRate::from_percent(23));
    /// assert_eq!(vat.cents(), 2070);
    ///
    /// // 6504 × 23% = 1495.92 → 1496
    /// let vat = Money::from_cents(6504).calculate_vat(VatRate::from_percent(23));
    /// assert_eq!(vat.cents(), 1496);
    /// ```
    pub fn calculate_vat(&self, rate: VatRate) -> Money {
        let vat = round_half_away(self.0 as i128 * rate.percent() as i128, 100);
        Money::saturating_from_wide(vat)
    }

    /// Returns `|bps|` hundredths-of-a-percent of this amount, rounded.
    ///
    /// ```rust
    /// use detailing_core::money::Money;
    ///
    /// // 34.96% of 10000
    /// assert_eq!(Money::from_cents(10000).percentage_amount(-3496).cents(), 3496);
    /// ```
    pub fn percentage_amount(&self, bps: i64) -> Money {
        let amount = round_half_away(self.0 as i128 * (bps as i128).abs(), 10_000);
        Money::saturating_from_wide(amount)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `major.minor` rendering; symbols are the console's concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

// Arithmetic saturates at the i64 bounds instead of panicking or wrapping.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
