//! # Pricing Calculator
//!
//! Turns one [`LineItem`] into its [`PricingResult`]. This is the single
//! implementation behind both the editable cart and the read-only summary.
//!
//! ## Formula Per Adjustment Kind
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base = base_price_net, vat = VAT %, all values in minor units          │
//! │                                                                         │
//! │  Percent(bps)   amount = round(base × |bps| / 10000)                    │
//! │                 net    = bps > 0 ? base + amount : base − amount        │
//! │  FixedNet(v)    net    = base − |v|                                     │
//! │  FixedGross(v)  net    = round((base × (100+vat) − 100 × |v|)/(100+vat))│
//! │  SetNet(v)      net    = v                                              │
//! │  SetGross(v)    net    = round(v × 100 / (100+vat))                     │
//! │                                                                         │
//! │  net   = max(net, 0)                                                    │
//! │  vat   = round(net × vat / 100)        gross = net + vat                │
//! │  SetGross only: gross = v              vat   = gross − net              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `FixedGross` is evaluated as one exact fraction: the gross target
//! `base × (100+vat)/100 − |v|` is never rounded before converting back to
//! net, so the only rounding is the final one.
//!
//! Intermediates are `i128`; anything that does not fit back into `i64`
//! saturates. Validated input stays far below that bound.

use crate::adjustment::Adjustment;
use crate::money::{round_half_away, Money};
use crate::types::{LineItem, PricingResult};

/// Prices one line. Pure; never fails.
///
/// ## Example
/// ```rust
/// use detailing_core::adjustment::Adjustment;
/// use detailing_core::money::Money;
/// use detailing_core::pricing::compute;
/// use detailing_core::types::{LineItem, VatRate};
///
/// let line = LineItem::new("svc-1", "Full detail", Money::from_cents(10000), VatRate::from_percent(23))
///     .with_adjustment(Adjustment::percent(-10));
///
/// let priced = compute(&line);
/// assert_eq!(priced.final_net.cents(), 9000);
/// assert_eq!(priced.vat_amount.cents(), 2070);
/// assert_eq!(priced.final_gross.cents(), 11070);
/// ```
pub fn compute(item: &LineItem) -> PricingResult {
    let base = item.base_price_net();
    let rate = item.vat_rate();
    let factor = rate.gross_factor();

    let raw_net = match item.adjustment() {
        Adjustment::Percent(bps) => {
            let amount = base.percentage_amount(bps);
            if bps > 0 {
                base + amount
            } else {
                base - amount
            }
        }
        Adjustment::FixedNet(value) => base - value.abs(),
        Adjustment::FixedGross(value) => {
            let numerator = base.cents() as i128 * factor - 100 * value.abs().cents() as i128;
            Money::saturating_from_wide(round_half_away(numerator, factor))
        }
        Adjustment::SetNet(value) => value,
        Adjustment::SetGross(value) => {
            Money::saturating_from_wide(round_half_away(value.cents() as i128 * 100, factor))
        }
    };

    // Negative prices are clamped, not rejected.
    let final_net = raw_net.clamp_non_negative();

    let (final_gross, vat_amount) = match item.adjustment() {
        // Requested gross is authoritative; VAT absorbs the ±1 from rounding net.
        Adjustment::SetGross(value) => (value, value - final_net),
        _ => {
            let vat = final_net.calculate_vat(rate);
            (final_net + vat, vat)
        }
    };

    let base_gross = base + base.calculate_vat(rate);
    let discount_net = base - final_net;
    let discount_gross = base_gross - final_gross;

    PricingResult {
        final_net,
        final_gross,
        vat_amount,
        discount_net,
        discount_gross,
        has_discount: !discount_net.is_zero(),
    }
}

/// Prices every line in order.
pub fn compute_all(items: &[LineItem]) -> Vec<PricingResult> {
    items.iter().map(compute).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
