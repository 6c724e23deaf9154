//! Cart document and line-item logic.
//!
//! A cart is one document per user: an insertion-ordered list of line items
//! plus a revision counter used for conditional writes. All line manipulation
//! happens in memory on the loaded document; the repository persists the
//! whole document back with a compare-and-swap on the revision.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copperleaf_core::{ProductId, UserId};

/// A (product reference, quantity, timestamp) tuple inside a cart.
///
/// Quantity is always >= 1; a mutation that would drive it to 0 or below
/// removes the line instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// A user's cart document.
#[derive(Debug, Clone)]
pub struct Cart {
    pub user_id: UserId,
    /// Line items, ordered by insertion.
    pub items: Vec<CartLine>,
    /// Revision counter for conditional writes.
    pub revision: i64,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// A fresh empty cart for a user, not yet persisted.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    /// Add `quantity` of a product, merging by product id.
    ///
    /// If a line for this product already exists its quantity is incremented;
    /// otherwise a new line is appended.
    pub fn add(&mut self, product_id: ProductId, quantity: u32, now: DateTime<Utc>) {
        match self.items.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartLine {
                product_id,
                quantity,
                added_at: now,
            }),
        }
    }

    /// Overwrite a line's quantity.
    ///
    /// A quantity of 0 or below removes the line (the designed remove-via-zero
    /// path). Returns `false` if no line for the product exists.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let Some(index) = self.items.iter().position(|l| l.product_id == product_id) else {
            return false;
        };
        if quantity <= 0 {
            self.items.remove(index);
        } else if let Some(line) = self.items.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove the line for a product. Succeeds silently if absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|l| l.product_id != product_id);
    }

    /// Empty the line list.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop lines whose product no longer exists in the catalog.
    pub fn retain_known_products(&mut self, known: &HashSet<ProductId>) {
        self.items.retain(|l| known.contains(&l.product_id));
    }

    /// Product ids referenced by the cart, in line order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|l| l.product_id).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        Cart::empty(UserId::new(1))
    }

    #[test]
    fn test_add_merges_by_product_id() {
        let mut cart = cart();
        let now = Utc::now();
        cart.add(ProductId::new(5), 2, now);
        cart.add(ProductId::new(5), 3, now);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = cart();
        let now = Utc::now();
        cart.add(ProductId::new(2), 1, now);
        cart.add(ProductId::new(1), 1, now);
        cart.add(ProductId::new(2), 1, now);

        assert_eq!(
            cart.product_ids(),
            vec![ProductId::new(2), ProductId::new(1)]
        );
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = cart();
        cart.add(ProductId::new(5), 2, Utc::now());

        assert!(cart.set_quantity(ProductId::new(5), 7));
        assert_eq!(cart.items.first().unwrap().quantity, 7);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = cart();
        let now = Utc::now();
        cart.add(ProductId::new(1), 2, now);
        cart.add(ProductId::new(2), 1, now);

        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert_eq!(cart.product_ids(), vec![ProductId::new(2)]);

        // Other lines are unaffected.
        assert_eq!(cart.items.first().unwrap().quantity, 1);
    }

    #[test]
    fn test_set_quantity_negative_removes_line() {
        let mut cart = cart();
        cart.add(ProductId::new(1), 2, Utc::now());

        assert!(cart.set_quantity(ProductId::new(1), -4));
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = cart();
        assert!(!cart.set_quantity(ProductId::new(9), 3));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = cart();
        cart.add(ProductId::new(1), 2, Utc::now());

        cart.remove(ProductId::new(1));
        cart.remove(ProductId::new(1));
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = cart();
        let now = Utc::now();
        cart.add(ProductId::new(1), 2, now);
        cart.add(ProductId::new(2), 1, now);

        cart.clear();
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_retain_known_products_prunes_stale_lines() {
        let mut cart = cart();
        let now = Utc::now();
        cart.add(ProductId::new(1), 2, now);
        cart.add(ProductId::new(2), 1, now);

        let known: HashSet<ProductId> = [ProductId::new(2)].into_iter().collect();
        cart.retain_known_products(&known);

        assert_eq!(cart.product_ids(), vec![ProductId::new(2)]);
    }

    #[test]
    fn test_line_serde_wire_format() {
        let line = CartLine {
            product_id: ProductId::new(3),
            quantity: 2,
            added_at: Utc::now(),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["productId"], 3);
        assert_eq!(json["quantity"], 2);
        assert!(json.get("addedAt").is_some());
    }
}
