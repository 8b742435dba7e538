//! # Console Commands
//!
//! Functions the browser console (and the CLI) invoke.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Console Commands                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │  cart.rs                        │  │  summary.rs                 │  │
//! │  │  ───────                        │  │  ──────────                 │  │
//! │  │  get_cart                       │  │  get_summary                │  │
//! │  │  add_service                    │  │  build_visit_submission     │  │
//! │  │  set_adjustment_kind            │  │                             │  │
//! │  │  set_adjustment                 │  │  (read-only views)          │  │
//! │  │  set_note                       │  │                             │  │
//! │  │  remove_line / clear_cart       │  │                             │  │
//! │  │  apply_target_total             │  │                             │  │
//! │  └─────────────────────────────────┘  └─────────────────────────────┘  │
//! │                                                                         │
//! │  Every command returns Result<T, ApiError>; pricing always comes from  │
//! │  detailing_core::compute, never from values cached on the client.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod summary;

pub use cart::{
    add_service, apply_target_total, clear_cart, get_cart, remove_line, set_adjustment,
    set_adjustment_kind, set_note, CartResponse, PricedLine, ServiceInput,
};
pub use summary::{
    build_visit_submission, get_summary, SubmissionLine, SummaryLine, SummaryView,
    VisitSubmission,
};
