//! # Cart
//!
//! The in-memory shopping cart. Never persisted.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Screen Action            Cart Method             Effect                │
//! │  ─────────────            ───────────             ──────                │
//! │                                                                         │
//! │  Tap "Add to cart" ──────► add(product) ────────► +1 or new line (1)   │
//! │                                                                         │
//! │  Change quantity ────────► set_quantity(id, q) ─► q > 0: set (capped)   │
//! │                                                   q ≤ 0: remove line    │
//! │                                                                         │
//! │  Check out ──────────────► clear() ─────────────► empty                 │
//! │                                                                         │
//! │  Total row ──────────────► total() ─────────────► Σ price × qty         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, ProductId};

/// Largest quantity a single cart line can hold.
///
/// `add` stops counting at this value and `set_quantity` clamps to it.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// A product in the cart with its quantity.
///
/// ## Snapshot
/// `product` is a full copy taken when the line was created. Later catalog
/// changes (e.g. the favorite flag) do not reach lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Product snapshot.
    pub product: Product,

    /// Quantity in cart, always in `1..=MAX_LINE_QUANTITY`.
    pub quantity: i64,

    /// When this line was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product: product.clone(),
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Id of the product on this line.
    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price() * self.quantity
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product bumps quantity)
/// - Every quantity is in `1..=MAX_LINE_QUANTITY` (setting ≤ 0 removes the line)
/// - Lines keep insertion order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created/last cleared.
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - If the product is already in the cart: quantity + 1, up to
    ///   [`MAX_LINE_QUANTITY`]
    /// - Otherwise: appends a new line with quantity 1
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            if line.quantity < MAX_LINE_QUANTITY {
                line.quantity += 1;
            }
            return;
        }

        self.lines.push(CartLine::from_product(product));
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity > 0`: replaces the line's quantity, clamped to
    ///   [`MAX_LINE_QUANTITY`]
    /// - `quantity <= 0`: removes the line
    /// - product not in cart: nothing happens
    ///
    /// ## Returns
    /// `true` if the cart changed.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        match self.line_mut(product_id) {
            Some(line) => {
                line.quantity = quantity.min(MAX_LINE_QUANTITY);
                true
            }
            None => false,
        }
    }

    /// Removes the line for a product. Returns `true` if one was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id() != product_id);
        self.lines.len() != initial_len
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of a product in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id() == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of price × quantity over all lines. Zero for an empty cart.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id() == product_id)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: ProductId, price_cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price_cents,
            category: "Tables".to_string(),
            image_ref: None,
            is_favorite: false,
        }
    }

    #[test]
    fn test_add_new_product() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1200));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.quantity_of(1), 1);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product(1, 1200);

        for _ in 0..5 {
            cart.add(&product);
        }

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.quantity_of(1), 5);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&test_product(3, 100));
        cart.add(&test_product(1, 100));
        cart.add(&test_product(3, 100));

        let ids: Vec<_> = cart.lines().iter().map(CartLine::product_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_set_quantity_positive() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1200));

        assert!(cart.set_quantity(1, 4));
        assert_eq!(cart.quantity_of(1), 4);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1200));
        cart.add(&test_product(2, 2500));

        assert!(cart.set_quantity(1, 0));
        assert!(cart.set_quantity(2, -3));

        assert!(cart.is_empty());
        assert!(cart.lines().iter().all(|l| l.quantity > 0));
    }

    #[test]
    fn test_set_quantity_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1200));

        assert!(!cart.set_quantity(42, 3));
        assert!(!cart.set_quantity(42, 0));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.quantity_of(1), 1);
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Money::zero());

        let lamp = test_product(1, 1200);
        let stand = test_product(2, 2500);
        cart.add(&lamp);
        cart.add(&lamp);
        cart.add(&stand);

        // 2 × $12.00 + 1 × $25.00
        assert_eq!(cart.total(), Money::from_cents(4900));
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_huge_quantity_is_clamped() {
        let mut cart = Cart::new();
        let lamp = test_product(1, 1200);
        cart.add(&lamp);

        assert!(cart.set_quantity(1, i64::MAX));
        assert_eq!(cart.quantity_of(1), MAX_LINE_QUANTITY);
        assert_eq!(cart.total(), Money::from_cents(1200 * MAX_LINE_QUANTITY));

        // Adding at the cap keeps the line at the cap.
        cart.add(&lamp);
        assert_eq!(cart.quantity_of(1), MAX_LINE_QUANTITY);
        assert_eq!(cart.total_quantity(), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_total_with_extreme_price_does_not_overflow() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, i64::MAX));
        cart.add(&test_product(2, i64::MAX));
        cart.set_quantity(1, i64::MAX);

        assert_eq!(cart.total(), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1200));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_line_is_a_snapshot() {
        let mut cart = Cart::new();
        let mut product = test_product(1, 1200);
        cart.add(&product);

        product.is_favorite = true;
        cart.add(&product);

        assert!(!cart.lines()[0].product.is_favorite);
        assert_eq!(cart.quantity_of(1), 2);
    }
}
