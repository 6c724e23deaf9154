//! Wishlist document.
//!
//! One document per user holding a duplicate-free list of saved product
//! references. Shares the cart's revision-counter write discipline.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use copperleaf_core::{ProductId, UserId};

/// A user's wishlist document.
#[derive(Debug, Clone)]
pub struct Wishlist {
    pub user_id: UserId,
    /// Saved product references, ordered by insertion, no duplicates.
    pub product_ids: Vec<ProductId>,
    /// Revision counter for conditional writes.
    pub revision: i64,
    pub updated_at: DateTime<Utc>,
}

impl Wishlist {
    /// A fresh empty wishlist for a user, not yet persisted.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            product_ids: Vec::new(),
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    /// Save a product reference.
    ///
    /// Returns `false` without mutating anything when the product is already
    /// present - the caller surfaces that as a conflict.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.product_ids.contains(&product_id) {
            return false;
        }
        self.product_ids.push(product_id);
        true
    }

    /// Remove a product reference. Succeeds silently if absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.product_ids.retain(|id| *id != product_id);
    }

    /// Empty the list.
    pub fn clear(&mut self) {
        self.product_ids.clear();
    }

    /// Drop references whose product no longer exists in the catalog.
    pub fn retain_known_products(&mut self, known: &HashSet<ProductId>) {
        self.product_ids.retain(|id| known.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicate() {
        let mut wishlist = Wishlist::empty(UserId::new(1));

        assert!(wishlist.add(ProductId::new(4)));
        assert!(!wishlist.add(ProductId::new(4)));

        // The list is unchanged by the rejected add.
        assert_eq!(wishlist.product_ids.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut wishlist = Wishlist::empty(UserId::new(1));
        wishlist.add(ProductId::new(4));

        wishlist.remove(ProductId::new(4));
        wishlist.remove(ProductId::new(4));
        assert!(wishlist.product_ids.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut wishlist = Wishlist::empty(UserId::new(1));
        wishlist.add(ProductId::new(1));
        wishlist.add(ProductId::new(2));

        wishlist.clear();
        assert!(wishlist.product_ids.is_empty());
    }

    #[test]
    fn test_retain_known_products() {
        let mut wishlist = Wishlist::empty(UserId::new(1));
        wishlist.add(ProductId::new(1));
        wishlist.add(ProductId::new(2));

        let known: HashSet<ProductId> = [ProductId::new(1)].into_iter().collect();
        wishlist.retain_known_products(&known);

        assert_eq!(wishlist.product_ids, vec![ProductId::new(1)]);
    }
}
