//! Wishlist aggregator.
//!
//! Mirrors the cart's fetch-or-create, remove, and clear operations, but add
//! rejects duplicates with a conflict instead of merging.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use copperleaf_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::db::wishlists::WishlistRepository;
use crate::models::product::Product;
use crate::models::wishlist::Wishlist;

/// How many times a lost revision race is retried before giving up.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Errors from wishlist operations.
#[derive(Debug, thiserror::Error)]
pub enum WishlistError {
    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The user has no wishlist yet.
    #[error("wishlist not found")]
    WishlistNotFound,

    /// The product is already saved; the wishlist is unchanged.
    #[error("item already in wishlist")]
    AlreadyInWishlist,

    /// Concurrent writers kept winning the revision race.
    #[error("wishlist was modified concurrently, please retry")]
    ConcurrentUpdate,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A hydrated wishlist, as returned by every wishlist endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub products: Vec<Product>,
    pub updated_at: DateTime<Utc>,
}

/// Wishlist aggregator service.
pub struct WishlistService<'a> {
    wishlists: WishlistRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> WishlistService<'a> {
    /// Create a new wishlist service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            wishlists: WishlistRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Return the user's wishlist, creating an empty one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Repository` if a query fails.
    pub async fn fetch(&self, user_id: UserId) -> Result<WishlistView, WishlistError> {
        let wishlist = self.load_or_create(user_id).await?;
        self.render(&wishlist).await
    }

    /// Save a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::ProductNotFound` if the product does not exist
    /// and `WishlistError::AlreadyInWishlist` if it is already saved.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistView, WishlistError> {
        self.products
            .get(product_id)
            .await?
            .ok_or(WishlistError::ProductNotFound)?;

        self.mutate(user_id, true, |wishlist| {
            if wishlist.add(product_id) {
                Ok(())
            } else {
                Err(WishlistError::AlreadyInWishlist)
            }
        })
        .await
    }

    /// Remove a product if present; succeeds silently when absent.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::WishlistNotFound` if the user has no wishlist.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistView, WishlistError> {
        self.mutate(user_id, false, |wishlist| {
            wishlist.remove(product_id);
            Ok(())
        })
        .await
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::WishlistNotFound` if the user has no wishlist yet.
    pub async fn clear(&self, user_id: UserId) -> Result<WishlistView, WishlistError> {
        self.mutate(user_id, false, |wishlist| {
            wishlist.clear();
            Ok(())
        })
        .await
    }

    /// Load the wishlist document, creating an empty one as a side effect.
    async fn load_or_create(&self, user_id: UserId) -> Result<Wishlist, WishlistError> {
        if let Some(wishlist) = self.wishlists.get(user_id).await? {
            return Ok(wishlist);
        }
        self.wishlists.create_if_missing(user_id).await?;
        self.wishlists
            .get(user_id)
            .await?
            .ok_or(WishlistError::WishlistNotFound)
    }

    /// Read-modify-write with a bounded retry on lost revision races.
    async fn mutate<F>(
        &self,
        user_id: UserId,
        create_missing: bool,
        apply: F,
    ) -> Result<WishlistView, WishlistError>
    where
        F: Fn(&mut Wishlist) -> Result<(), WishlistError>,
    {
        for attempt in 0..MAX_WRITE_ATTEMPTS {
            let mut wishlist = if create_missing {
                self.load_or_create(user_id).await?
            } else {
                self.wishlists
                    .get(user_id)
                    .await?
                    .ok_or(WishlistError::WishlistNotFound)?
            };

            apply(&mut wishlist)?;

            let products = self.products.get_many(&wishlist.product_ids).await?;
            let known: HashSet<ProductId> = products.iter().map(|p| p.id).collect();
            wishlist.retain_known_products(&known);

            if self.wishlists.save(&wishlist).await? {
                return Ok(WishlistView {
                    products: order_by_saved(&wishlist, products),
                    updated_at: Utc::now(),
                });
            }

            tracing::debug!(%user_id, attempt, "wishlist revision conflict, retrying");
        }

        Err(WishlistError::ConcurrentUpdate)
    }

    /// The read-time join for non-mutating fetches.
    async fn render(&self, wishlist: &Wishlist) -> Result<WishlistView, WishlistError> {
        let products = self.products.get_many(&wishlist.product_ids).await?;
        Ok(WishlistView {
            products: order_by_saved(wishlist, products),
            updated_at: wishlist.updated_at,
        })
    }
}

/// Order fetched products by their saved position in the wishlist.
fn order_by_saved(wishlist: &Wishlist, mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by_key(|p| {
        wishlist
            .product_ids
            .iter()
            .position(|id| *id == p.id)
            .unwrap_or(usize::MAX)
    });
    products
}
