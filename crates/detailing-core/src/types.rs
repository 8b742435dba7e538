//! # Domain Types
//!
//! Core domain types shared by the editable cart and the summary view.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │  PricingResult  │   │   CartTotals    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  final_net      │──►│  total_net      │       │
//! │  │  service_id     │   │  final_gross    │   │  total_gross    │       │
//! │  │  base_price_net │   │  vat_amount     │   │  total_vat      │       │
//! │  │  vat_rate       │   │  discount_*     │   └─────────────────┘       │
//! │  │  adjustment     │   └─────────────────┘                              │
//! │  └─────────────────┘    derived, never stored                           │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    VatRate      │   │ AllocationBasis │                              │
//! │  │  percent (u32)  │   │  Net | Gross    │                              │
//! │  │  23 = 23%       │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frozen Pricing Inputs
//! A line's base net price and VAT rate are captured when the service is
//! added and never change afterwards. Only the adjustment and the note are
//! mutable, which is why those fields are private behind accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::adjustment::{Adjustment, AdjustmentKind};
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// VAT Rate
// =============================================================================

/// A flat VAT rate in whole percent (23 = 23%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct VatRate(u32);

impl VatRate {
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        VatRate(percent)
    }

    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0
    }

    /// `100 + rate`, the denominator for converting gross back to net.
    #[inline]
    pub const fn gross_factor(&self) -> i128 {
        100 + self.0 as i128
    }

    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }
}

// =============================================================================
// Allocation Basis
// =============================================================================

/// Whether a target-total request is a net or a gross figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AllocationBasis {
    Net,
    /// Customers are quoted gross prices, so this is what the modal defaults to.
    #[default]
    Gross,
}

impl AllocationBasis {
    /// The absolute override kind that pins a line's total in this basis.
    pub const fn override_kind(&self) -> AdjustmentKind {
        match self {
            AllocationBasis::Net => AdjustmentKind::SetNet,
            AllocationBasis::Gross => AdjustmentKind::SetGross,
        }
    }
}

impl fmt::Display for AllocationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationBasis::Net => write!(f, "net"),
            AllocationBasis::Gross => write!(f, "gross"),
        }
    }
}

impl FromStr for AllocationBasis {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "net" | "netto" => Ok(AllocationBasis::Net),
            "gross" | "brutto" => Ok(AllocationBasis::Gross),
            other => Err(ValidationError::InvalidFormat {
                field: "basis".to_string(),
                reason: format!("unknown basis '{}', expected net or gross", other),
            }),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced service entry in a cart or visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier (UUID v4).
    id: String,

    /// Catalog service this line was created from.
    service_id: String,

    /// Service name at time of adding (frozen).
    name: String,

    /// Net price in minor units at time of adding (frozen).
    base_price_net: Money,

    /// VAT rate in whole percent at time of adding (frozen).
    vat_rate_percent: u32,

    adjustment: Adjustment,

    #[serde(default)]
    note: Option<String>,

    #[ts(as = "String")]
    added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line with a fresh UUID and the neutral `Percent 0` adjustment.
    ///
    /// Inputs are expected to be validated already (see [`crate::validation`]).
    pub fn new(
        service_id: impl Into<String>,
        name: impl Into<String>,
        base_price_net: Money,
        vat_rate: VatRate,
    ) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            service_id: service_id.into(),
            name: name.into(),
            base_price_net,
            vat_rate_percent: vat_rate.percent(),
            adjustment: Adjustment::NONE,
            note: None,
            added_at: Utc::now(),
        }
    }

    /// Builder-style adjustment, handy when importing a saved cart.
    pub fn with_adjustment(mut self, adjustment: Adjustment) -> Self {
        self.adjustment = adjustment;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn base_price_net(&self) -> Money {
        self.base_price_net
    }

    #[inline]
    pub fn vat_rate(&self) -> VatRate {
        VatRate::from_percent(self.vat_rate_percent)
    }

    #[inline]
    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Replaces the adjustment wholesale (kind and value).
    pub fn set_adjustment(&mut self, adjustment: Adjustment) {
        self.adjustment = adjustment;
    }

    /// Switches the adjustment kind, resetting its value to zero.
    pub fn set_adjustment_kind(&mut self, kind: AdjustmentKind) {
        self.adjustment = self.adjustment.with_kind(kind);
    }

    pub fn set_note(&mut self, note: Option<String>) {
        self.note = note;
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// The priced view of one line. Always recomputed from its `LineItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub final_net: Money,
    pub final_gross: Money,
    pub vat_amount: Money,
    /// Positive when the line is cheaper than its catalog net price.
    pub discount_net: Money,
    pub discount_gross: Money,
    pub has_discount: bool,
}

impl PricingResult {
    /// The line's total in the given basis.
    #[inline]
    pub fn total_in(&self, basis: AllocationBasis) -> Money {
        match basis {
            AllocationBasis::Net => self.final_net,
            AllocationBasis::Gross => self.final_gross,
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart-wide sums of already-rounded line values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_net: Money,
    pub total_gross: Money,
    pub total_vat: Money,
    pub total_discount_net: Money,
    pub total_discount_gross: Money,
}

impl CartTotals {
    /// The cart total in the given basis.
    #[inline]
    pub fn total_in(&self, basis: AllocationBasis) -> Money {
        match basis {
            AllocationBasis::Net => self.total_net,
            AllocationBasis::Gross => self.total_gross,
        }
    }

    /// Folds one priced line into the running totals.
    pub fn accumulate(&mut self, pricing: &PricingResult) {
        self.line_count += 1;
        self.total_net += pricing.final_net;
        self.total_gross += pricing.final_gross;
        self.total_vat += pricing.vat_amount;
        self.total_discount_net += pricing.discount_net;
        self.total_discount_gross += pricing.discount_gross;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
