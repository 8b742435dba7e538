//! # Cart Commands
//!
//! Commands for editing the operator's cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Editing  │────►│ Summary  │────►│  Visit   │       │
//! │  │  Cart    │     │          │     │          │     │ Created  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_service       build_visit_submission              │
//! │                   set_adjustment*   (summary.rs)                        │
//! │                   apply_target_total                                    │
//! │                   remove_line                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use detailing_core::validation::{
    validate_adjustment, validate_base_price, validate_note, validate_service_id,
    validate_service_name, validate_uuid, validate_vat_rate_percent,
};
use detailing_core::{
    allocate, parse_target, Adjustment, AdjustmentKind, AllocationBasis, Cart,
    CartTotals, LineItem, Money, PricingResult, VatRate,
};

use crate::error::ApiError;
use crate::state::{CartState, ConsoleConfig};

/// A catalog service the operator wants on the cart.
///
/// This is also the line format of cart files read by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub service_id: String,
    pub name: String,
    pub base_price_net: Money,

    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub vat_rate_percent: Option<u32>,

    #[serde(default)]
    pub adjustment: Option<Adjustment>,

    #[serde(default)]
    pub note: Option<String>,
}

/// A line together with its freshly computed pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub item: LineItem,
    pub pricing: PricingResult,
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<PricedLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        let items: Vec<PricedLine> = cart
            .items()
            .iter()
            .zip(cart.priced())
            .map(|(item, pricing)| PricedLine {
                item: item.clone(),
                pricing,
            })
            .collect();
        let totals = detailing_core::cart::totals_of(items.iter().map(|line| line.pricing));

        CartResponse { items, totals }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a service line to the cart.
///
/// ## Behavior
/// - Base price and VAT rate are frozen on the new line
/// - The line starts with the neutral `Percent 0` unless the input carries
///   an adjustment
/// - Lines are never merged: the same service twice is two lines
pub fn add_service(
    cart: &CartState,
    config: &ConsoleConfig,
    input: ServiceInput,
) -> Result<CartResponse, ApiError> {
    debug!(service_id = %input.service_id, "add_service command");

    validate_service_id(&input.service_id)?;
    validate_service_name(&input.name)?;
    validate_base_price(input.base_price_net)?;

    let vat_rate = input
        .vat_rate_percent
        .map(VatRate::from_percent)
        .unwrap_or_else(|| config.default_vat_rate());
    validate_vat_rate_percent(vat_rate.percent())?;

    let adjustment = input.adjustment.unwrap_or_default();
    validate_adjustment(&adjustment)?;

    let note = validate_note(input.note.as_deref())?;

    let item = LineItem::new(
        input.service_id.trim(),
        input.name.trim(),
        input.base_price_net,
        vat_rate,
    )
    .with_adjustment(adjustment)
    .with_note(note);

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.add_line(item, config.max_cart_lines())?;
        Ok(CartResponse::from(&*c))
    })
}

/// Switches a line's adjustment kind. The value resets to zero.
pub fn set_adjustment_kind(
    cart: &CartState,
    line_id: &str,
    kind: AdjustmentKind,
) -> Result<CartResponse, ApiError> {
    debug!(line_id = %line_id, %kind, "set_adjustment_kind command");
    validate_uuid(line_id)?;

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.set_adjustment_kind(line_id, kind)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Replaces a line's adjustment kind and value.
pub fn set_adjustment(
    cart: &CartState,
    line_id: &str,
    adjustment: Adjustment,
) -> Result<CartResponse, ApiError> {
    debug!(line_id = %line_id, ?adjustment, "set_adjustment command");
    validate_uuid(line_id)?;

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.set_adjustment(line_id, adjustment)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Sets or clears a line's note. Blank notes clear it.
pub fn set_note(
    cart: &CartState,
    line_id: &str,
    note: Option<String>,
) -> Result<CartResponse, ApiError> {
    debug!(line_id = %line_id, "set_note command");
    validate_uuid(line_id)?;
    let note = validate_note(note.as_deref())?;

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.set_note(line_id, note)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Removes a line from the cart.
pub fn remove_line(cart: &CartState, line_id: &str) -> Result<CartResponse, ApiError> {
    debug!(line_id = %line_id, "remove_line command");
    validate_uuid(line_id)?;

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        let removed = c.remove_line(line_id)?;
        debug!(service_id = %removed.service_id(), "Line removed");
        Ok(CartResponse::from(&*c))
    })
}

/// Clears all lines from the cart.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

/// Rewrites every line's adjustment so the cart total equals `target`.
///
/// ## Flow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Operator types "150,00" in the target-total modal                      │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  parse_target("150,00") ──► 15000 minor units                           │
/// │                    │                                                    │
/// │                    ▼   (cart locked from here)                          │
/// │  allocate(items, 15000, basis)                                          │
/// │    ├─ Err ──► cart untouched, error returned                            │
/// │    └─ Ok  ──► items replaced, cart total == 15000                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn apply_target_total(
    cart: &CartState,
    target: &str,
    basis: AllocationBasis,
) -> Result<CartResponse, ApiError> {
    debug!(target = %target, %basis, "apply_target_total command");

    let target = parse_target(target).map_err(|e| {
        warn!(error = %e, "Target total rejected");
        e
    })?;

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        match allocate(c.items(), target, basis) {
            Ok(allocation) => {
                info!(
                    target = %target,
                    %basis,
                    discount_bps = allocation.discount_bps,
                    remainder = %allocation.remainder,
                    corrected_lines = ?allocation.corrected_line_ids,
                    "Target total applied"
                );
                c.replace_items(allocation.items);
                Ok(CartResponse::from(&*c))
            }
            Err(e) => {
                warn!(error = %e, "Target total rejected");
                Err(e.into())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn service(id: &str, base: i64, vat: Option<u32>) -> ServiceInput {
        ServiceInput {
            service_id: id.to_string(),
            name: format!("Service {}", id),
            base_price_net: Money::from_cents(base),
            vat_rate_percent: vat,
            adjustment: None,
            note: None,
        }
    }

    fn setup(lines: &[(i64, Option<u32>)]) -> (CartState, ConsoleConfig, Vec<String>) {
        let cart = CartState::new();
        let config = ConsoleConfig::default();
        for (i, (base, vat)) in lines.iter().enumerate() {
            add_service(&cart, &config, service(&format!("svc-{}", i), *base, *vat)).unwrap();
        }
        let ids = cart.with_cart(|c| c.items().iter().map(|i| i.id().to_string()).collect());
        (cart, config, ids)
    }

    #[test]
    fn test_add_service_uses_default_vat() {
        let (cart, _, _) = setup(&[(10000, None), (10000, Some(8))]);
        let response = get_cart(&cart);

        assert_eq!(response.items[0].item.vat_rate().percent(), 23);
        assert_eq!(response.items[0].item.adjustment(), Adjustment::NONE);
        assert_eq!(response.items[1].pricing.final_gross.cents(), 10800);
        assert_eq!(response.totals.total_gross.cents(), 23100);
    }

    #[test]
    fn test_add_service_validation() {
        let cart = CartState::new();
        let config = ConsoleConfig::default();

        let mut input = service("svc", 1000, None);
        input.name = "  ".to_string();
        let err = add_service(&cart, &config, input).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_service(&cart, &config, service("svc", -1, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_service(&cart, &config, service("svc", 1000, Some(150))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_service(&cart, &config, service("svc", i64::MAX - 1, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(get_cart(&cart).items.is_empty());
    }

    #[test]
    fn test_add_service_respects_line_limit() {
        let cart = CartState::new();
        let mut config = ConsoleConfig::default();
        config.pricing.max_cart_lines = 1;

        add_service(&cart, &config, service("a", 1000, None)).unwrap();
        let err = add_service(&cart, &config, service("b", 1000, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_percent_discount_line() {
        let (cart, _, ids) = setup(&[(10000, Some(23))]);

        let response = set_adjustment(&cart, &ids[0], Adjustment::percent(-10)).unwrap();
        let pricing = response.items[0].pricing;
        assert_eq!(pricing.final_net.cents(), 9000);
        assert_eq!(pricing.vat_amount.cents(), 2070);
        assert_eq!(pricing.final_gross.cents(), 11070);
        assert!(pricing.has_discount);
    }

    #[test]
    fn test_set_adjustment_kind_resets_value() {
        let (cart, _, ids) = setup(&[(10000, Some(23))]);
        set_adjustment(&cart, &ids[0], Adjustment::percent(-10)).unwrap();

        let response = set_adjustment_kind(&cart, &ids[0], AdjustmentKind::SetGross).unwrap();
        assert_eq!(
            response.items[0].item.adjustment(),
            Adjustment::SetGross(Money::zero())
        );
        assert_eq!(response.totals.total_gross.cents(), 0);
    }

    #[test]
    fn test_negative_override_rejected() {
        let (cart, _, ids) = setup(&[(10000, Some(23))]);
        let err = set_adjustment(&cart, &ids[0], Adjustment::SetNet(Money::from_cents(-1))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_unknown_and_malformed_line_ids() {
        let (cart, _, _) = setup(&[(10000, Some(23))]);

        let err = remove_line(&cart, "550e8400-e29b-41d4-a716-446655440000").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = remove_line(&cart, "not-a-uuid").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_set_note_and_remove() {
        let (cart, _, ids) = setup(&[(10000, Some(23)), (5000, Some(23))]);

        let response = set_note(&cart, &ids[0], Some("  ceramic coat  ".to_string())).unwrap();
        assert_eq!(response.items[0].item.note(), Some("ceramic coat"));

        let response = set_note(&cart, &ids[0], Some("   ".to_string())).unwrap();
        assert_eq!(response.items[0].item.note(), None);

        let response = remove_line(&cart, &ids[0]).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.totals.total_net.cents(), 5000);

        let response = clear_cart(&cart);
        assert_eq!(response.totals, CartTotals::default());
    }

    #[test]
    fn test_apply_target_total_gross() {
        let (cart, _, ids) = setup(&[(10000, Some(23)), (5000, Some(23))]);

        let response = apply_target_total(&cart, "120,00", AllocationBasis::Gross).unwrap();
        assert_eq!(response.totals.total_gross.cents(), 12000);
        assert_eq!(response.items[0].item.id(), ids[0]);
        assert_eq!(
            response.items[0].item.adjustment(),
            Adjustment::percent_bps(-3496)
        );

        // The committed cart matches the response.
        assert_eq!(get_cart(&cart), response);
    }

    #[test]
    fn test_apply_target_total_net_with_remainder() {
        let (cart, _, _) = setup(&[(3333, Some(0)), (3333, Some(0)), (3333, Some(0))]);

        let response = apply_target_total(&cart, "50", AllocationBasis::Net).unwrap();
        assert_eq!(response.totals.total_net.cents(), 5000);
        assert_eq!(
            response.items[2].item.adjustment(),
            Adjustment::SetNet(Money::from_cents(1666))
        );
    }

    #[test]
    fn test_apply_target_total_on_pre_discounted_cart() {
        let (cart, _, ids) = setup(&[(10000, Some(23)), (100, Some(23))]);
        set_adjustment(&cart, &ids[0], Adjustment::percent(-50)).unwrap();
        assert_eq!(get_cart(&cart).totals.total_gross.cents(), 6273);

        let response = apply_target_total(&cart, "61,73", AllocationBasis::Gross).unwrap();
        assert_eq!(response.totals.total_gross.cents(), 6173);
        assert_eq!(response.items[0].item.adjustment(), Adjustment::percent_bps(-5031));
    }

    #[test]
    fn test_apply_target_total_rejections_leave_cart_untouched() {
        let (cart, _, _) = setup(&[(10000, Some(23)), (5000, Some(23))]);
        let before = get_cart(&cart);

        let err = apply_target_total(&cart, "200", AllocationBasis::Gross).unwrap_err();
        assert_eq!(err.code, ErrorCode::TargetAboveCurrentTotal);

        let err = apply_target_total(&cart, "0", AllocationBasis::Gross).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTarget);

        let err = apply_target_total(&cart, "12.345", AllocationBasis::Gross).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTarget);

        assert_eq!(get_cart(&cart), before);
    }

    #[test]
    fn test_apply_target_total_on_empty_cart() {
        let cart = CartState::new();
        let response = apply_target_total(&cart, "100", AllocationBasis::Gross).unwrap();
        assert!(response.items.is_empty());
    }
}
