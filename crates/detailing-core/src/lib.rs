//! # detailing-core: Pure Pricing Engine for the Detailing Console
//!
//! This crate prices service lines, totals carts, and solves target-total
//! discounts. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Detailing Console Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser Console                              │   │
//! │  │    Intake ──► Check-in Wizard ──► Cart ──► Summary ──► Visit    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Console Commands (apps/console)              │   │
//! │  │    add_service, set_adjustment, apply_target_total, ...         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ detailing-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │ pricing  │ │   cart   │ │    allocation    │  │   │
//! │  │   │adjustment│ │ compute  │ │  totals  │ │ apply_target_... │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FLOATS • PURE FUNCTIONS                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type and the half-away-from-zero rounding rule
//! - [`adjustment`] - The five adjustment kinds as a tagged union
//! - [`types`] - LineItem, PricingResult, CartTotals, VatRate, AllocationBasis
//! - [`pricing`] - One line in, one priced result out
//! - [`cart`] - Cart container and totals aggregation
//! - [`allocation`] - Target-total discount allocation
//! - [`validation`] - Input validation and decimal amount parsing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use detailing_core::{apply_target_total, compute, totals};
//! use detailing_core::{Adjustment, AllocationBasis, LineItem, Money, VatRate};
//!
//! let wash = LineItem::new("svc-wash", "Hand wash", Money::from_cents(10000), VatRate::from_percent(23))
//!     .with_adjustment(Adjustment::percent(-10));
//! assert_eq!(compute(&wash).final_gross.cents(), 11070);
//!
//! let cart = vec![wash];
//! let allocated = apply_target_total(&cart, Money::from_cents(10000), AllocationBasis::Gross).unwrap();
//! assert_eq!(totals(&allocated).total_gross.cents(), 10000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adjustment;
pub mod allocation;
pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use adjustment::{Adjustment, AdjustmentKind};
pub use allocation::{allocate, apply_target_total, parse_target, Allocation};
pub use cart::{totals, Cart};
pub use error::{AllocationError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::compute;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Hard cap on lines in a single cart.
///
/// A visit rarely has more than a dozen services; the console may configure
/// a lower limit but never a higher one.
pub const MAX_CART_LINES: usize = 100;

/// VAT rate applied to new lines when the catalog entry carries none.
pub const DEFAULT_VAT_RATE_PERCENT: u32 = 23;
