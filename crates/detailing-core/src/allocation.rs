//! # Discount Allocator
//!
//! Lets an operator type one target price for the whole cart and infers
//! every line's discount from it.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_target_total(items, target, basis)                               │
//! │                                                                         │
//! │  1. target ≤ 0                       → InvalidTarget                    │
//! │  2. current = totals(items)[basis]          (adjustments as they are)   │
//! │  3. target > current                 → TargetAboveCurrentTotal          │
//! │  4. base = totals(items at Percent 0)[basis]                            │
//! │     bps  = round((base − target) × 10000 / base)        (0.01% steps)   │
//! │     bps > 100%                       → TargetBelowZeroAfterDiscount     │
//! │  5. every line ← Percent(−bps)                                          │
//! │  6. remainder = totals(lines)[basis] − target                           │
//! │  7. walking back from the last line, each line ← SetGross / SetNet      │
//! │     (own − remainder, floored at 0) until the remainder is used up      │
//! │  8. return the rewritten lines                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The percentage is taken from the catalog prices, not from the current
//! total, because the broadcast replaces whatever adjustments the lines
//! carried. A cart the operator already surcharged above its catalog total
//! gets a negative `bps`, i.e. a uniform surcharge.
//!
//! The remainder is a rounding residue, usually a few minor units, and in
//! most carts the last line absorbs all of it. A line priced below the
//! remainder floors at zero and passes the rest to the line before it, so
//! the result always totals exactly `target`.
//!
//! The whole pass runs over one borrowed snapshot and returns a new list, so
//! a caller can never observe the broadcast without its correction. A refused
//! request returns before any line is copied. Running the allocator again on
//! its own output with the same target reproduces the same adjustments.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::adjustment::Adjustment;
use crate::cart::totals;
use crate::error::{AllocationError, AllocationResult};
use crate::money::{round_half_away, Money};
use crate::pricing::compute;
use crate::types::{AllocationBasis, LineItem};
use crate::validation::parse_money;

/// Hundredths of a percent in 100%.
const FULL_DISCOUNT_BPS: i64 = 10_000;

/// The outcome of one allocation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Every line, in the original order, with its new adjustment.
    pub items: Vec<LineItem>,

    /// The uniform discount broadcast to every line, in hundredths of a
    /// percent; negative for a surcharge.
    pub discount_bps: i64,

    /// `actual − target` after the broadcast; negative when the broadcast
    /// undershoots.
    pub remainder: Money,

    /// Lines rewritten to an absolute override to absorb the remainder, in
    /// cart order. Usually empty or just the last line.
    pub corrected_line_ids: Vec<String>,
}

impl Allocation {
    fn empty() -> Self {
        Allocation {
            items: Vec::new(),
            discount_bps: 0,
            remainder: Money::zero(),
            corrected_line_ids: Vec::new(),
        }
    }
}

/// Rewrites every line's adjustment so the cart total in `basis` is exactly
/// `target`.
///
/// ## Example
/// ```rust
/// use detailing_core::allocation::apply_target_total;
/// use detailing_core::cart::totals;
/// use detailing_core::money::Money;
/// use detailing_core::types::{AllocationBasis, LineItem, VatRate};
///
/// let items = vec![
///     LineItem::new("svc-a", "Exterior", Money::from_cents(10000), VatRate::from_percent(23)),
///     LineItem::new("svc-b", "Interior", Money::from_cents(5000), VatRate::from_percent(23)),
/// ];
///
/// let allocated = apply_target_total(&items, Money::from_cents(12000), AllocationBasis::Gross).unwrap();
/// assert_eq!(totals(&allocated).total_gross.cents(), 12000);
/// ```
pub fn apply_target_total(
    items: &[LineItem],
    target: Money,
    basis: AllocationBasis,
) -> AllocationResult<Vec<LineItem>> {
    allocate(items, target, basis).map(|allocation| allocation.items)
}

/// Like [`apply_target_total`], but also reports the broadcast percentage
/// and the remainder correction.
pub fn allocate(
    items: &[LineItem],
    target: Money,
    basis: AllocationBasis,
) -> AllocationResult<Allocation> {
    if !target.is_positive() {
        return Err(AllocationError::InvalidTarget(format!(
            "{} must be greater than zero",
            target
        )));
    }

    if items.is_empty() {
        return Ok(Allocation::empty());
    }

    let current = totals(items).total_in(basis);
    if target > current {
        return Err(AllocationError::TargetAboveCurrentTotal { target, current });
    }

    let mut allocated: Vec<LineItem> = items
        .iter()
        .cloned()
        .map(|item| item.with_adjustment(Adjustment::NONE))
        .collect();
    let base_total = totals(&allocated).total_in(basis);

    // A zero catalog total cannot be scaled; the correction carries it all.
    let discount_bps = if base_total.is_positive() {
        round_half_away(
            (base_total - target).cents() as i128 * FULL_DISCOUNT_BPS as i128,
            base_total.cents() as i128,
        ) as i64
    } else {
        0
    };

    // Unreachable while target > 0.
    if discount_bps > FULL_DISCOUNT_BPS {
        return Err(AllocationError::TargetBelowZeroAfterDiscount { target, current });
    }

    let broadcast = Adjustment::percent_bps(-discount_bps);
    for item in &mut allocated {
        item.set_adjustment(broadcast);
    }

    let remainder = totals(&allocated).total_in(basis) - target;
    let corrected_line_ids = absorb_remainder(&mut allocated, remainder, basis);

    Ok(Allocation {
        items: allocated,
        discount_bps,
        remainder,
        corrected_line_ids,
    })
}

/// Moves line totals by `remainder`, last line first, flooring each at zero.
///
/// Exact whenever the lines sum to `target + remainder` with `target > 0`.
fn absorb_remainder(
    items: &mut [LineItem],
    remainder: Money,
    basis: AllocationBasis,
) -> Vec<String> {
    let mut remaining = remainder;
    let mut corrected = Vec::new();

    for item in items.iter_mut().rev() {
        if remaining.is_zero() {
            break;
        }

        let own = compute(item).total_in(basis);
        let adjusted = (own - remaining).clamp_non_negative();
        if adjusted == own {
            continue;
        }

        item.set_adjustment(Adjustment::new(basis.override_kind(), adjusted.cents()));
        remaining -= own - adjusted;
        corrected.push(item.id().to_string());
    }

    corrected.reverse();
    corrected
}

/// Parses an operator-typed target (`"120,00"`) for the allocator.
///
/// Unparsable and non-positive input both map to
/// [`AllocationError::InvalidTarget`].
pub fn parse_target(input: &str) -> AllocationResult<Money> {
    let target =
        parse_money(input).map_err(|err| AllocationError::InvalidTarget(err.to_string()))?;

    if !target.is_positive() {
        return Err(AllocationError::InvalidTarget(format!(
            "{} must be greater than zero",
            target
        )));
    }

    Ok(target)
}

// =============================================================================
// Unit Tests
// =============================================================================
