//! # Cart Reducer
//!
//! The shopping cart as a pure reducer. Persistence is layered on top by
//! `homecraft-client`'s `CartStore`; nothing here touches storage.
//!
//! ## Merge Policy: Full Replace
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    add_or_replace(item)                                 │
//! │                                                                         │
//! │  cart: [ {p1, qty 2, price 12000}, {p7, qty 1} ]                       │
//! │                                                                         │
//! │  add_or_replace({p1, qty 5, price 11500})                              │
//! │       │                                                                 │
//! │       ├── p1 present?  YES → the WHOLE record is swapped               │
//! │       │                      (qty AND price AND name ... )             │
//! │       │                                                                 │
//! │       └── p1 present?  NO  → appended at the end                       │
//! │                                                                         │
//! │  cart: [ {p1, qty 5, price 11500}, {p7, qty 1} ]                       │
//! │                                                                         │
//! │  Callers that want "one more" read the current qty, add one, and       │
//! │  pass the complete item back. See `set_quantity`.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Durable Shape
//! The cart serializes as a bare JSON list using the storefront's field
//! names (`product`, `name`, `image`, `price`, `countInStock`, `qty`) so
//! records written by earlier clients load unchanged.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_quantity;

/// Stock hint recorded when a product reports none.
pub const DEFAULT_STOCK_HINT: i64 = 10;

/// A line in the cart.
///
/// ## Design Notes
/// - `product_id`: unique key within the cart
/// - everything else is a snapshot taken when the line was last written;
///   catalog edits after that are not reflected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID (cart key).
    #[serde(rename = "product")]
    pub product_id: String,

    pub name: String,

    /// Image reference for the cart thumbnail.
    #[serde(default)]
    pub image: String,

    /// Unit price at time of adding.
    pub price: Money,

    /// Stock on hand when added. A hint for the quantity picker only.
    #[serde(default)]
    pub count_in_stock: i64,

    /// Quantity, always >= 1.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartItem {
    /// Creates a cart line from raw parts.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        count_in_stock: i64,
        quantity: u32,
    ) -> Self {
        CartItem {
            product_id: product_id.into(),
            name: name.into(),
            image: String::new(),
            price,
            count_in_stock,
            quantity,
        }
    }

    /// Snapshots a catalog product into a cart line.
    ///
    /// A product reporting zero stock is recorded with
    /// [`DEFAULT_STOCK_HINT`], the same hint the storefront's product pages
    /// put in the cart.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        let count_in_stock = match product.count_in_stock {
            0 => DEFAULT_STOCK_HINT,
            n => n,
        };
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
            count_in_stock,
            quantity,
        }
    }

    /// Returns the same line with a different quantity.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        CartItem {
            quantity,
            ..self.clone()
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - At most one item per `product_id`
/// - Every quantity is >= 1
/// - Items keep insertion order; a replace keeps the original position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from a persisted list.
    ///
    /// Lines with a zero quantity are dropped and, should the list carry a
    /// product twice, the later line wins, exactly as if the lines had been
    /// re-added in order.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if item.quantity > 0 {
                cart.replace_or_push(item);
            }
        }
        cart
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up the line for a product.
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Adds `item`, or fully replaces the existing line for the same product.
    ///
    /// ## Behavior
    /// - Product already in cart: the whole record is overwritten in place
    /// - Product not in cart: appended
    /// - Quantity 0: rejected, cart untouched
    pub fn add_or_replace(&mut self, item: CartItem) -> CoreResult<()> {
        validate_quantity(item.quantity)?;
        self.replace_or_push(item);
        Ok(())
    }

    fn replace_or_push(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Changes the quantity of an existing line.
    ///
    /// The existing record is read, rebuilt with the new quantity and
    /// written back through [`Cart::add_or_replace`]. Returns `Ok(false)`
    /// when the product is not in the cart (nothing to change).
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> CoreResult<bool> {
        validate_quantity(quantity)?;

        let Some(existing) = self.get(product_id) else {
            return Ok(false);
        };
        let updated = existing.with_quantity(quantity);
        self.add_or_replace(updated)?;
        Ok(true)
    }

    /// Removes the line for a product. Returns whether anything was removed;
    /// an absent product is not an error.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Removes the lines that still match `ordered` exactly.
    ///
    /// A line added or rewritten after the order was built no longer
    /// matches and stays. Returns the number of lines removed.
    pub fn remove_ordered(&mut self, ordered: &[CartItem]) -> usize {
        let before = self.items.len();
        self.items.retain(|line| !ordered.contains(line));
        before - self.items.len()
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total number of units (sum of quantities). This is the badge count.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of quantity × unit price.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Summary for display.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: u64,
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}
