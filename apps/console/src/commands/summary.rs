//! # Summary Commands
//!
//! Read-only views of the cart: the summary screen and the payload sent
//! when a visit is created.
//!
//! Both price lines with the same `detailing_core::compute` the editable cart
//! uses, so the summary can never disagree with what the operator saw.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use detailing_core::{
    compute, Adjustment, Cart, CartTotals, LineItem, Money, PricingResult, ValidationError,
};

use crate::error::ApiError;
use crate::state::{CartState, ConsoleConfig};

// =============================================================================
// Summary View
// =============================================================================

/// One line of the summary screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub line_id: String,
    pub name: String,
    pub adjustment: Adjustment,

    /// e.g. "-10%", "-5,00 zł net", "= 120,00 zł gross"; `None` when neutral.
    pub adjustment_label: Option<String>,

    pub pricing: PricingResult,
    pub net_display: String,
    pub vat_display: String,
    pub gross_display: String,
    pub note: Option<String>,
}

/// The summary screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub lines: Vec<SummaryLine>,
    pub totals: CartTotals,
    pub total_net_display: String,
    pub total_vat_display: String,
    pub total_gross_display: String,

    /// Present only when at least one line is discounted.
    pub total_discount_display: Option<String>,
}

/// Builds the summary view of the current cart.
pub fn get_summary(cart: &CartState, config: &ConsoleConfig) -> SummaryView {
    debug!("get_summary command");
    cart.with_cart(|c| summarize(c, config))
}

fn summarize(cart: &Cart, config: &ConsoleConfig) -> SummaryView {
    let mut totals = CartTotals::default();

    let lines = cart
        .items()
        .iter()
        .zip(cart.priced())
        .map(|(item, pricing)| {
            totals.accumulate(&pricing);

            SummaryLine {
                line_id: item.id().to_string(),
                name: item.name().to_string(),
                adjustment: item.adjustment(),
                adjustment_label: adjustment_label(item.adjustment(), config),
                pricing,
                net_display: config.format_money(pricing.final_net),
                vat_display: config.format_money(pricing.vat_amount),
                gross_display: config.format_money(pricing.final_gross),
                note: item.note().map(str::to_string),
            }
        })
        .collect();

    SummaryView {
        lines,
        total_net_display: config.format_money(totals.total_net),
        total_vat_display: config.format_money(totals.total_vat),
        total_gross_display: config.format_money(totals.total_gross),
        total_discount_display: totals
            .total_discount_gross
            .is_positive()
            .then(|| config.format_money(totals.total_discount_gross)),
        totals,
    }
}

/// Operator-facing description of an adjustment.
fn adjustment_label(adjustment: Adjustment, config: &ConsoleConfig) -> Option<String> {
    match adjustment {
        Adjustment::Percent(0) => None,
        Adjustment::Percent(bps) => {
            let sign = if bps < 0 { "-" } else { "+" };
            let whole = bps.abs() / 100;
            let frac = bps.abs() % 100;
            Some(if frac == 0 {
                format!("{}{}%", sign, whole)
            } else {
                format!(
                    "{}{}{}{:02}%",
                    sign, whole, config.currency.decimal_separator, frac
                )
            })
        }
        Adjustment::FixedNet(v) if v.is_zero() => None,
        Adjustment::FixedGross(v) if v.is_zero() => None,
        Adjustment::FixedNet(v) => Some(format!("{} net", signed(v, config))),
        Adjustment::FixedGross(v) => Some(format!("{} gross", signed(v, config))),
        Adjustment::SetNet(v) => Some(format!("= {} net", config.format_money(v))),
        Adjustment::SetGross(v) => Some(format!("= {} gross", config.format_money(v))),
    }
}

/// Fixed amounts are always discounts, whatever sign was typed.
fn signed(value: Money, config: &ConsoleConfig) -> String {
    format!("-{}", config.format_money(value.abs()))
}

// =============================================================================
// Visit Submission
// =============================================================================

/// One line as sent to order/visit creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionLine {
    pub line_id: String,
    pub service_id: String,
    pub name: String,
    pub base_price_net: Money,
    pub vat_rate_percent: u32,

    /// The resolved adjustment, including any allocator override.
    pub adjustment: Adjustment,

    pub pricing: PricingResult,
    pub note: Option<String>,
}

impl From<&LineItem> for SubmissionLine {
    fn from(item: &LineItem) -> Self {
        SubmissionLine {
            line_id: item.id().to_string(),
            service_id: item.service_id().to_string(),
            name: item.name().to_string(),
            base_price_net: item.base_price_net(),
            vat_rate_percent: item.vat_rate().percent(),
            adjustment: item.adjustment(),
            pricing: compute(item),
            note: item.note().map(str::to_string),
        }
    }
}

/// Payload for creating a visit from the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitSubmission {
    pub id: String,
    pub customer_ref: String,
    pub vehicle_ref: String,
    pub currency: String,
    pub lines: Vec<SubmissionLine>,
    pub totals: CartTotals,
    pub created_at: DateTime<Utc>,
}

/// Builds the visit payload from the current cart.
///
/// The cart is left as is; the caller clears it once the visit is stored.
///
/// ## Errors
/// - `VALIDATION_ERROR` when either reference is blank
/// - `CART_ERROR` when the cart is empty
pub fn build_visit_submission(
    cart: &CartState,
    config: &ConsoleConfig,
    customer_ref: &str,
    vehicle_ref: &str,
) -> Result<VisitSubmission, ApiError> {
    debug!(customer_ref = %customer_ref, vehicle_ref = %vehicle_ref, "build_visit_submission command");

    let customer_ref = required(customer_ref, "customer_ref")?;
    let vehicle_ref = required(vehicle_ref, "vehicle_ref")?;

    let submission = cart.with_cart(|c| -> Result<VisitSubmission, ApiError> {
        if c.is_empty() {
            return Err(ApiError::cart("Cannot create a visit from an empty cart"));
        }

        let lines: Vec<SubmissionLine> = c.items().iter().map(SubmissionLine::from).collect();
        let totals = detailing_core::cart::totals_of(lines.iter().map(|l| l.pricing));

        Ok(VisitSubmission {
            id: Uuid::new_v4().to_string(),
            customer_ref,
            vehicle_ref,
            currency: config.currency.code.clone(),
            lines,
            totals,
            created_at: Utc::now(),
        })
    })?;

    info!(
        visit_id = %submission.id,
        lines = submission.lines.len(),
        total_gross = %submission.totals.total_gross,
        "Visit submission built"
    );

    Ok(submission)
}

fn required(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        }
        .into());
    }
    Ok(value.to_string())
}
