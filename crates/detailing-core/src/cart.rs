//! # Cart
//!
//! The ordered list of service lines plus the aggregator that sums their
//! priced results.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line 1 ──compute──► PricingResult ─┐                                   │
//! │  line 2 ──compute──► PricingResult ─┼──► Σ ──► CartTotals               │
//! │  line 3 ──compute──► PricingResult ─┘                                   │
//! │                                                                         │
//! │  No rounding happens at this level: totals are plain sums of           │
//! │  already-rounded line values, so error never compounds.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adjustment::{Adjustment, AdjustmentKind};
use crate::error::{CoreError, CoreResult};
use crate::pricing::{compute, compute_all};
use crate::types::{CartTotals, LineItem, PricingResult};
use crate::validation::validate_adjustment;
use crate::MAX_CART_LINES;

/// Sums the priced results of `items`.
///
/// ## Example
/// ```rust
/// use detailing_core::cart::totals;
/// use detailing_core::money::Money;
/// use detailing_core::types::{LineItem, VatRate};
///
/// let items = vec![
///     LineItem::new("svc-a", "Exterior", Money::from_cents(10000), VatRate::from_percent(23)),
///     LineItem::new("svc-b", "Interior", Money::from_cents(5000), VatRate::from_percent(23)),
/// ];
/// let totals = totals(&items);
/// assert_eq!(totals.total_gross.cents(), 18450);
/// assert_eq!(totals.total_net.cents(), 15000);
/// assert_eq!(totals.total_vat.cents(), 3450);
/// ```
pub fn totals(items: &[LineItem]) -> CartTotals {
    totals_of(items.iter().map(compute))
}

/// Sums results that were already computed.
pub fn totals_of<I>(priced: I) -> CartTotals
where
    I: IntoIterator<Item = PricingResult>,
{
    priced
        .into_iter()
        .fold(CartTotals::default(), |mut acc, pricing| {
            acc.accumulate(&pricing);
            acc
        })
}

/// The operator's cart.
///
/// ## Invariants
/// - Line order is preserved; the allocator corrects the last line
/// - Base price and VAT rate of a line never change after it is added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,

    /// When the cart was created/last cleared.
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Creates a cart from already-built lines, keeping their order.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Cart {
            items,
            created_at: Utc::now(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Appends a line, enforcing `max_lines` (never above [`MAX_CART_LINES`]).
    pub fn add_line(&mut self, item: LineItem, max_lines: usize) -> CoreResult<&LineItem> {
        let max_lines = max_lines.min(MAX_CART_LINES);
        if self.items.len() >= max_lines {
            return Err(CoreError::CartTooLarge { max: max_lines });
        }
        self.items.push(item);
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    pub fn get(&self, line_id: &str) -> CoreResult<&LineItem> {
        self.items
            .iter()
            .find(|i| i.id() == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }

    fn get_mut(&mut self, line_id: &str) -> CoreResult<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|i| i.id() == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }

    /// Switches a line's adjustment kind; the value resets to zero.
    pub fn set_adjustment_kind(&mut self, line_id: &str, kind: AdjustmentKind) -> CoreResult<()> {
        self.get_mut(line_id)?.set_adjustment_kind(kind);
        Ok(())
    }

    /// Replaces a line's adjustment after validating it.
    pub fn set_adjustment(&mut self, line_id: &str, adjustment: Adjustment) -> CoreResult<()> {
        validate_adjustment(&adjustment)?;
        self.get_mut(line_id)?.set_adjustment(adjustment);
        Ok(())
    }

    pub fn set_note(&mut self, line_id: &str, note: Option<String>) -> CoreResult<()> {
        self.get_mut(line_id)?.set_note(note);
        Ok(())
    }

    /// Removes a line by ID.
    pub fn remove_line(&mut self, line_id: &str) -> CoreResult<LineItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id() == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Replaces every line at once. Used to commit an allocation result.
    pub fn replace_items(&mut self, items: Vec<LineItem>) {
        self.items = items;
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Priced results in line order.
    pub fn priced(&self) -> Vec<PricingResult> {
        compute_all(&self.items)
    }

    pub fn totals(&self) -> CartTotals {
        totals(&self.items)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{AllocationBasis, VatRate};

    fn line(base: i64, vat: u32) -> LineItem {
        LineItem::new("svc", "Service", Money::from_cents(base), VatRate::from_percent(vat))
    }

    #[test]
    fn test_empty_totals_are_zero() {
        let totals = totals(&[]);
        assert_eq!(totals, CartTotals::default());
        assert_eq!(totals.line_count, 0);
    }

    #[test]
    fn test_totals_are_pairwise_sums() {
        let items = vec![
            line(999, 23).with_adjustment(Adjustment::percent_bps(-1234)),
            line(1001, 8).with_adjustment(Adjustment::SetGross(Money::from_cents(777))),
            line(5000, 23).with_adjustment(Adjustment::FixedGross(Money::from_cents(333))),
            line(3, 5),
        ];

        let priced: Vec<PricingResult> = items.iter().map(compute).collect();
        let totals = totals(&items);

        let net: Money = priced.iter().map(|p| p.final_net).sum();
        let gross: Money = priced.iter().map(|p| p.final_gross).sum();
        let vat: Money = priced.iter().map(|p| p.vat_amount).sum();

        assert_eq!(totals.total_net, net);
        assert_eq!(totals.total_gross, gross);
        assert_eq!(totals.total_vat, vat);
        assert_eq!(totals.total_gross, totals.total_net + totals.total_vat);
        assert_eq!(totals.line_count, 4);
    }

    #[test]
    fn test_priced_follows_line_order() {
        let cart = Cart::from_items(vec![line(100, 0), line(200, 23), line(300, 8)]);
        let gross: Vec<i64> = cart.priced().iter().map(|p| p.final_gross.cents()).collect();
        assert_eq!(gross, vec![100, 246, 324]);
        assert_eq!(totals_of(cart.priced()), cart.totals());
    }

    #[test]
    fn test_totals_in_basis() {
        let items = vec![line(10000, 23), line(5000, 23)];
        let totals = totals(&items);
        assert_eq!(totals.total_in(AllocationBasis::Gross).cents(), 18450);
        assert_eq!(totals.total_in(AllocationBasis::Net).cents(), 15000);
    }

    #[test]
    fn test_add_line_respects_limit() {
        let mut cart = Cart::new();
        cart.add_line(line(100, 23), 2).unwrap();
        cart.add_line(line(200, 23), 2).unwrap();

        let err = cart.add_line(line(300, 23), 2).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { max: 2 }));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_add_line_caps_configured_limit() {
        let mut cart = Cart::from_items(vec![line(100, 0); MAX_CART_LINES]);
        let err = cart.add_line(line(100, 0), usize::MAX).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { max: MAX_CART_LINES }));
    }

    #[test]
    fn test_set_adjustment_kind_resets_value() {
        let mut cart = Cart::new();
        let id = cart.add_line(line(10000, 23), 10).unwrap().id().to_string();

        cart.set_adjustment(&id, Adjustment::percent(-20)).unwrap();
        assert_eq!(cart.totals().total_net.cents(), 8000);

        cart.set_adjustment_kind(&id, AdjustmentKind::FixedNet).unwrap();
        assert_eq!(cart.get(&id).unwrap().adjustment(), Adjustment::FixedNet(Money::zero()));
        assert_eq!(cart.totals().total_net.cents(), 10000);
    }

    #[test]
    fn test_set_adjustment_rejects_negative_override() {
        let mut cart = Cart::new();
        let id = cart.add_line(line(10000, 23), 10).unwrap().id().to_string();

        let err = cart
            .set_adjustment(&id, Adjustment::SetNet(Money::from_cents(-5)))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cart.get(&id).unwrap().adjustment(), Adjustment::NONE);
    }

    #[test]
    fn test_unknown_line() {
        let mut cart = Cart::new();
        assert!(matches!(cart.remove_line("missing"), Err(CoreError::LineNotFound(_))));
        assert!(matches!(
            cart.set_adjustment_kind("missing", AdjustmentKind::SetNet),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut cart = Cart::new();
        let a = cart.add_line(line(100, 0), 10).unwrap().id().to_string();
        let b = cart.add_line(line(200, 0), 10).unwrap().id().to_string();
        let c = cart.add_line(line(300, 0), 10).unwrap().id().to_string();

        let removed = cart.remove_line(&b).unwrap();
        assert_eq!(removed.base_price_net().cents(), 200);

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str()]);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_line(line(100, 0), 10).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.totals(), CartTotals::default());
    }
}
