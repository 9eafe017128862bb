//! # Cart Store
//!
//! The [`Cart`] reducer with write-through persistence.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  UI Action              CartStore                 Durable "cartItems"   │
//! │  ─────────              ─────────                 ───────────────────   │
//! │                                                                         │
//! │  Add to cart ─────────► add_or_replace() ───────► full list written    │
//! │                                                                         │
//! │  +/- buttons ─────────► set_quantity() ─────────► full list written    │
//! │                                                                         │
//! │  Remove ──────────────► remove() ───────────────► full list written    │
//! │                                                                         │
//! │  Order placed ────────► remove_ordered() ───────► list written, or key │
//! │                                                    removed when empty  │
//! │  Clear ───────────────► clear() ────────────────► key removed          │
//! │                                                                         │
//! │  Every write happens before the call returns. A failed write is        │
//! │  logged and the in-memory cart stays authoritative.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use homecraft_core::{Cart, CartItem, CartTotals, CART_KEY};
use homecraft_storage::{KeyValueStore, KeyValueStoreExt};

use crate::error::ClientResult;

/// Durable shopping cart.
pub struct CartStore {
    cart: Mutex<Cart>,
    storage: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Loads the persisted cart. Missing or unreadable data yields an empty
    /// cart.
    pub fn rehydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let cart = match storage.get_json::<Vec<CartItem>>(CART_KEY) {
            Ok(Some(items)) => Cart::from_items(items),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart");
                Cart::new()
            }
        };
        debug!(lines = cart.line_count(), "Cart rehydrated");

        CartStore {
            cart: Mutex::new(cart),
            storage,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, cart: &Cart) {
        if let Err(e) = self.storage.set_json(CART_KEY, cart.items()) {
            warn!(error = %e, "Failed to persist cart");
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    pub fn totals(&self) -> CartTotals {
        self.lock().totals()
    }

    /// Adds a line or fully replaces the existing line for that product.
    pub fn add_or_replace(&self, item: CartItem) -> ClientResult<()> {
        let mut cart = self.lock();
        let product_id = item.product_id.clone();
        cart.add_or_replace(item)?;
        self.persist(&cart);
        debug!(product_id = %product_id, lines = cart.line_count(), "Cart line written");
        Ok(())
    }

    /// Changes a line's quantity. `Ok(false)` when the product isn't in
    /// the cart.
    pub fn set_quantity(&self, product_id: &str, quantity: u32) -> ClientResult<bool> {
        let mut cart = self.lock();
        let changed = cart.set_quantity(product_id, quantity)?;
        if changed {
            self.persist(&cart);
            debug!(product_id, quantity, "Cart quantity changed");
        }
        Ok(changed)
    }

    /// Removes a line. Absent products are ignored.
    pub fn remove(&self, product_id: &str) -> bool {
        let mut cart = self.lock();
        let removed = cart.remove(product_id);
        self.persist(&cart);
        debug!(product_id, removed, "Cart line removed");
        removed
    }

    /// Drops the lines an accepted order was built from. Lines written
    /// since then survive; an emptied cart loses its durable record.
    pub fn remove_ordered(&self, ordered: &[CartItem]) -> usize {
        let mut cart = self.lock();
        let removed = cart.remove_ordered(ordered);
        if cart.is_empty() {
            self.forget();
        } else {
            self.persist(&cart);
        }
        debug!(removed, remaining = cart.line_count(), "Ordered lines removed");
        removed
    }

    /// Empties the cart and deletes the durable record.
    pub fn clear(&self) {
        let mut cart = self.lock();
        cart.clear();
        self.forget();
        debug!("Cart cleared");
    }

    fn forget(&self) {
        if let Err(e) = self.storage.remove(CART_KEY) {
            warn!(error = %e, "Failed to remove persisted cart");
        }
    }
}
