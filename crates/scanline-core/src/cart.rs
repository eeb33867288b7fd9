//! # Cart Module
//!
//! The ordered list of scanned items and its running total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                                   │
//! │                                                                         │
//! │  Kiosk Action              Operation              Cart State Change     │
//! │  ────────────              ─────────              ─────────────────     │
//! │                                                                         │
//! │  Detection event ────────► add_item() ──────────► items.push(item)     │
//! │                                                    (fresh monotonic id) │
//! │                                                                         │
//! │  Tap remove ─────────────► remove_item(id) ─────► items.retain(..)     │
//! │                                                                         │
//! │  Checkout / clear ───────► clear() ─────────────► items.clear()        │
//! │                                                                         │
//! │  Export ─────────────────► snapshot() ──────────► (read only copy)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every add appends a new line: scanning the same product twice produces
//! two items with distinct ids (there is no quantity merging - the scan
//! stream is the source of truth). The cart knows nothing about stats or
//! persistence; the coordinating session owns those side effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{DisplayNames, Product};
use crate::money::Money;

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the cart.
///
/// ## Design Notes
/// - `id`: fresh monotonic counter per cart; the removal key
/// - product data is frozen at add time (snapshot pattern), so a later
///   catalog change cannot silently reprice a cart line
/// - `confidence`: the classification score that produced this line, if
///   the item came from a detection rather than a manual add
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Monotonic per-cart identifier.
    pub id: u64,

    /// Catalog id of the product this line was created from.
    pub product_id: u32,

    /// Display names at time of adding (frozen).
    pub names: DisplayNames,

    /// Price at time of adding (frozen).
    pub price: Money,

    /// Winning-class confidence of the detection that added this line.
    pub confidence: Option<f32>,

    /// When this item was added.
    pub added_at: DateTime<Utc>,
}

// =============================================================================
// Cart
// =============================================================================

/// The cart: an ordered item list plus its id counter.
///
/// ## Invariant
/// `total() == items.iter().map(|i| i.price).sum()` after any sequence of
/// operations.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Items, in scan order.
    items: Vec<CartItem>,

    /// Next id to hand out. Never reused within a cart's lifetime, even
    /// across `clear()`.
    next_id: u64,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends a product to the cart and returns the created item.
    ///
    /// Always appends - adding the same product twice yields two lines
    /// with distinct ids.
    pub fn add_item(&mut self, product: &Product, confidence: Option<f32>) -> CartItem {
        let item = CartItem {
            id: self.next_id,
            product_id: product.id,
            names: product.names.clone(),
            price: product.price,
            confidence,
            added_at: Utc::now(),
        };
        self.next_id += 1;
        self.items.push(item.clone());
        item
    }

    /// Removes the first item with the given id.
    ///
    /// Returns `true` if an item was removed; a missing id is a no-op.
    pub fn remove_item(&mut self, id: u64) -> bool {
        match self.items.iter().position(|i| i.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Clears all items. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of item prices.
    pub fn total(&self) -> Money {
        self.items.iter().map(|i| i.price).sum()
    }

    /// Number of items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items, in scan order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Takes an immutable snapshot for export or display.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total(),
            taken_at: Utc::now(),
        }
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// An immutable copy of cart state, taken for export or rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Item copies, in scan order.
    pub items: Vec<CartItem>,

    /// Total at snapshot time.
    pub total: Money,

    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
}

impl CartSnapshot {
    /// Number of items in the snapshot.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn coffee_and_water() -> (Product, Product) {
        let catalog = Catalog::reference();
        (
            catalog.match_label("caffee").unwrap().clone(),
            catalog.match_label("water").unwrap().clone(),
        )
    }

    #[test]
    fn test_add_appends_with_fresh_ids() {
        let (coffee, _) = coffee_and_water();
        let mut cart = Cart::new();

        let first = cart.add_item(&coffee, Some(0.82));
        let second = cart.add_item(&coffee, Some(0.79));

        // Same product, two lines, distinct ids.
        assert_eq!(cart.item_count(), 2);
        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
        assert_eq!(cart.total().centimes(), 20_000);
    }

    #[test]
    fn test_remove_by_id() {
        let (coffee, water) = coffee_and_water();
        let mut cart = Cart::new();

        let a = cart.add_item(&coffee, None);
        let b = cart.add_item(&water, None);

        assert!(cart.remove_item(a.id));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].id, b.id);
        assert_eq!(cart.total(), water.price);

        // Missing id is a no-op.
        assert!(!cart.remove_item(a.id));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_clear_keeps_id_counter() {
        let (coffee, _) = coffee_and_water();
        let mut cart = Cart::new();

        let before = cart.add_item(&coffee, None);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());

        let after = cart.add_item(&coffee, None);
        assert!(after.id > before.id);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let (coffee, water) = coffee_and_water();
        let mut cart = Cart::new();
        cart.add_item(&coffee, Some(0.9));
        cart.add_item(&water, Some(0.8));

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(snapshot.total.centimes(), 13_000);

        cart.clear();
        // The snapshot does not observe later mutation.
        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(snapshot.total.centimes(), 13_000);
    }

    /// Invariant check over pseudo-random add/remove sequences: the total
    /// always equals the sum of the remaining items' prices.
    #[test]
    fn test_total_invariant_over_random_sequences() {
        let (coffee, water) = coffee_and_water();

        // Deterministic xorshift so the sequence is reproducible.
        let mut state: u64 = 0x5EED_CAFE_D00D_0001;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        let mut cart = Cart::new();
        let mut live_ids: Vec<u64> = Vec::new();

        for _ in 0..500 {
            match next() % 3 {
                // Two parts add, one part remove, so the cart grows and
                // shrinks over the run.
                0 => {
                    let item = cart.add_item(&coffee, None);
                    live_ids.push(item.id);
                }
                1 => {
                    let item = cart.add_item(&water, Some(0.75));
                    live_ids.push(item.id);
                }
                _ => {
                    if !live_ids.is_empty() {
                        let idx = (next() as usize) % live_ids.len();
                        let id = live_ids.swap_remove(idx);
                        assert!(cart.remove_item(id));
                    } else {
                        // Removing from an empty cart is a no-op.
                        assert!(!cart.remove_item(9_999_999));
                    }
                }
            }

            let expected: Money = cart.items().iter().map(|i| i.price).sum();
            assert_eq!(cart.total(), expected);
            assert_eq!(cart.item_count(), live_ids.len());
        }
    }
}
