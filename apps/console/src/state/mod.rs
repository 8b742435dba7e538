//! # State Module
//!
//! Console state, split by concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐  │
//! │  │       CartState          │        │        ConsoleConfig         │  │
//! │  │                          │        │                              │  │
//! │  │  Arc<Mutex<Cart>>        │        │  currency, default VAT,      │  │
//! │  │  (mutated by commands)   │        │  basis, line limit           │  │
//! │  │                          │        │  (read-only after load)      │  │
//! │  └──────────────────────────┘        └──────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take exactly the state they need, so a summary render never
//! contends with config access.

mod cart;
mod config;

pub use cart::CartState;
pub use config::{ConsoleConfig, CurrencyConfig, PricingConfig};
