//! # Cart State
//!
//! Shared handle to the operator's cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Operator Action         Command                  Cart State Change     │
//! │  ───────────────         ───────                  ─────────────────     │
//! │                                                                         │
//! │  Pick service ──────────► add_service() ─────────► items.push(line)     │
//! │                                                                         │
//! │  Change kind ───────────► set_adjustment_kind() ─► kind, value = 0      │
//! │                                                                         │
//! │  Type discount ─────────► set_adjustment() ──────► kind + value         │
//! │                                                                         │
//! │  "Total 150 zł" ────────► apply_target_total() ──► every adjustment     │
//! │                                                                         │
//! │  Click Remove ──────────► remove_line() ─────────► items.remove(i)      │
//! │                                                                         │
//! │  NOTE: The allocator reads and rewrites the cart under one lock, so     │
//! │        no edit can slip in between reading totals and committing.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use detailing_core::Cart;

/// Shared cart state.
///
/// Cart operations are short and mostly writes, so a plain `Mutex` is used.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::from_cart(Cart::new())
    }

    /// Wraps an existing cart, e.g. one loaded from a file.
    pub fn from_cart(cart: Cart) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        // Every cart mutation is a single assignment or push, so a poisoned
        // lock still guards a consistent cart.
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.remove_line(&line_id))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}
