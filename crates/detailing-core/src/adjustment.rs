//! # Adjustments
//!
//! The five ways an operator (or the allocator) can move a line away from
//! its catalog price.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind          Value unit              Meaning                         │
//! │  ──────────    ────────────────────    ───────────────────────────     │
//! │  Percent       hundredths of a %       -1000 = 10% off, 500 = +5%      │
//! │  FixedNet      Money (net)             take |value| off the net price  │
//! │  FixedGross    Money (gross)           take |value| off the gross      │
//! │  SetNet        Money (net)             net price IS value              │
//! │  SetGross      Money (gross)           gross price IS value            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Percent values are fixed point with two implied decimals so that a
//! whole-number operator discount (`-10%` → `-1000`) and an allocator
//! discount (`-34.96%` → `-3496`) share one representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Hundredths of a percent in one whole percent.
pub const BPS_PER_PERCENT: i64 = 100;

/// The discriminator of an [`Adjustment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Percent,
    FixedNet,
    FixedGross,
    SetNet,
    SetGross,
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentKind::Percent => write!(f, "percent"),
            AdjustmentKind::FixedNet => write!(f, "fixed_net"),
            AdjustmentKind::FixedGross => write!(f, "fixed_gross"),
            AdjustmentKind::SetNet => write!(f, "set_net"),
            AdjustmentKind::SetGross => write!(f, "set_gross"),
        }
    }
}

/// A line adjustment: a closed tagged union with one value per variant.
///
/// Serialized adjacently tagged so the browser sees
/// `{ "kind": "percent", "value": -1000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Adjustment {
    /// Signed percentage in hundredths of a percent.
    Percent(i64),
    FixedNet(Money),
    FixedGross(Money),
    SetNet(Money),
    SetGross(Money),
}

impl Adjustment {
    /// The neutral adjustment every new line starts with.
    pub const NONE: Adjustment = Adjustment::Percent(0);

    /// Builds a `kind` adjustment from a raw integer value.
    pub const fn new(kind: AdjustmentKind, value: i64) -> Self {
        match kind {
            AdjustmentKind::Percent => Adjustment::Percent(value),
            AdjustmentKind::FixedNet => Adjustment::FixedNet(Money::from_cents(value)),
            AdjustmentKind::FixedGross => Adjustment::FixedGross(Money::from_cents(value)),
            AdjustmentKind::SetNet => Adjustment::SetNet(Money::from_cents(value)),
            AdjustmentKind::SetGross => Adjustment::SetGross(Money::from_cents(value)),
        }
    }

    /// A whole-percent adjustment, as typed by an operator.
    ///
    /// ```rust
    /// use detailing_core::adjustment::Adjustment;
    ///
    /// assert_eq!(Adjustment::percent(-10), Adjustment::Percent(-1000));
    /// ```
    pub const fn percent(whole: i64) -> Self {
        Adjustment::Percent(whole * BPS_PER_PERCENT)
    }

    /// A fixed-point percentage in hundredths of a percent.
    pub const fn percent_bps(bps: i64) -> Self {
        Adjustment::Percent(bps)
    }

    /// A zero-valued adjustment of `kind`.
    pub const fn zero(kind: AdjustmentKind) -> Self {
        Adjustment::new(kind, 0)
    }

    pub const fn kind(&self) -> AdjustmentKind {
        match self {
            Adjustment::Percent(_) => AdjustmentKind::Percent,
            Adjustment::FixedNet(_) => AdjustmentKind::FixedNet,
            Adjustment::FixedGross(_) => AdjustmentKind::FixedGross,
            Adjustment::SetNet(_) => AdjustmentKind::SetNet,
            Adjustment::SetGross(_) => AdjustmentKind::SetGross,
        }
    }

    /// The raw integer value: hundredths of a percent or minor units.
    pub const fn value(&self) -> i64 {
        match self {
            Adjustment::Percent(bps) => *bps,
            Adjustment::FixedNet(m)
            | Adjustment::FixedGross(m)
            | Adjustment::SetNet(m)
            | Adjustment::SetGross(m) => m.cents(),
        }
    }

    /// Switches to `kind`. The value always resets to zero, even when the
    /// kind is unchanged, so a stale percentage never turns into money.
    pub const fn with_kind(&self, kind: AdjustmentKind) -> Self {
        Adjustment::zero(kind)
    }
}

impl Default for Adjustment {
    fn default() -> Self {
        Adjustment::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_percent() {
        assert_eq!(Adjustment::default(), Adjustment::Percent(0));
        assert_eq!(Adjustment::default().kind(), AdjustmentKind::Percent);
    }

    #[test]
    fn test_new_round_trips_kind_and_value() {
        for kind in [
            AdjustmentKind::Percent,
            AdjustmentKind::FixedNet,
            AdjustmentKind::FixedGross,
            AdjustmentKind::SetNet,
            AdjustmentKind::SetGross,
        ] {
            let adjustment = Adjustment::new(kind, 1234);
            assert_eq!(adjustment.kind(), kind);
            assert_eq!(adjustment.value(), 1234);
        }
    }

    #[test]
    fn test_switching_kind_resets_value() {
        let discount = Adjustment::percent(-15);
        let switched = discount.with_kind(AdjustmentKind::FixedGross);
        assert_eq!(switched, Adjustment::FixedGross(Money::zero()));

        let money = Adjustment::SetNet(Money::from_cents(5000));
        assert_eq!(money.with_kind(AdjustmentKind::Percent), Adjustment::Percent(0));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(Adjustment::percent(-10)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "percent", "value": -1000 }));

        let parsed: Adjustment =
            serde_json::from_str(r#"{ "kind": "set_gross", "value": 12000 }"#).unwrap();
        assert_eq!(parsed, Adjustment::SetGross(Money::from_cents(12000)));
    }
}
