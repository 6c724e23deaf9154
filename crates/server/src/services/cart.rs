//! Cart aggregator.
//!
//! Maps a user to their cart document and applies the line-item rules:
//! merge-by-product-id on add, overwrite-or-delete on quantity update,
//! idempotent remove. Every mutation persists the whole document with a
//! conditional write and every response is hydrated against the catalog.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use copperleaf_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::cart::Cart;
use crate::models::product::Product;

/// How many times a lost revision race is retried before giving up.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Errors from cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The user has no cart yet.
    #[error("cart not found")]
    CartNotFound,

    /// The cart has no line for the referenced product.
    #[error("item not in cart")]
    ItemNotInCart,

    /// Add requires a quantity of at least 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Concurrent writers kept winning the revision race.
    #[error("cart was modified concurrently, please retry")]
    ConcurrentUpdate,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A cart line joined with its catalog product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// A hydrated cart, as returned by every cart endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub updated_at: DateTime<Utc>,
}

/// Cart aggregator service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Return the user's cart, creating an empty one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn fetch(&self, user_id: UserId) -> Result<CartView, CartError> {
        let cart = self.load_or_create(user_id).await?;
        let products = self.lookup_products(&cart).await?;
        Ok(render(&cart, &products))
    }

    /// Add `quantity` of a product to the cart, merging by product id.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity and
    /// `CartError::ProductNotFound` if the product does not exist.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartView, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        self.products
            .get(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        self.mutate(user_id, true, |cart| {
            cart.add(product_id, quantity, Utc::now());
            Ok(())
        })
        .await
    }

    /// Overwrite a line's quantity; a quantity of 0 or below removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no cart and
    /// `CartError::ItemNotInCart` if no line matches the product.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartView, CartError> {
        self.mutate(user_id, false, |cart| {
            if cart.set_quantity(product_id, quantity) {
                Ok(())
            } else {
                Err(CartError::ItemNotInCart)
            }
        })
        .await
    }

    /// Remove a line if present; succeeds silently when absent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no cart.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartView, CartError> {
        self.mutate(user_id, false, |cart| {
            cart.remove(product_id);
            Ok(())
        })
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no cart yet.
    pub async fn clear(&self, user_id: UserId) -> Result<CartView, CartError> {
        self.mutate(user_id, false, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    /// Load the cart document, creating an empty one as a side effect.
    async fn load_or_create(&self, user_id: UserId) -> Result<Cart, CartError> {
        if let Some(cart) = self.carts.get(user_id).await? {
            return Ok(cart);
        }
        self.carts.create_if_missing(user_id).await?;
        self.carts
            .get(user_id)
            .await?
            .ok_or(CartError::CartNotFound)
    }

    /// Read-modify-write with a bounded retry on lost revision races.
    ///
    /// Lines referencing products that vanished from the catalog are pruned
    /// before the document is persisted.
    async fn mutate<F>(
        &self,
        user_id: UserId,
        create_missing: bool,
        apply: F,
    ) -> Result<CartView, CartError>
    where
        F: Fn(&mut Cart) -> Result<(), CartError>,
    {
        for attempt in 0..MAX_WRITE_ATTEMPTS {
            let mut cart = if create_missing {
                self.load_or_create(user_id).await?
            } else {
                self.carts
                    .get(user_id)
                    .await?
                    .ok_or(CartError::CartNotFound)?
            };

            apply(&mut cart)?;

            let products = self.lookup_products(&cart).await?;
            let known: HashSet<ProductId> = products.keys().copied().collect();
            cart.retain_known_products(&known);

            if self.carts.save(&cart).await? {
                cart.updated_at = Utc::now();
                return Ok(render(&cart, &products));
            }

            tracing::debug!(%user_id, attempt, "cart revision conflict, retrying");
        }

        Err(CartError::ConcurrentUpdate)
    }

    /// The read-time join: fetch catalog details for every referenced product.
    async fn lookup_products(
        &self,
        cart: &Cart,
    ) -> Result<HashMap<ProductId, Product>, CartError> {
        let products = self.products.get_many(&cart.product_ids()).await?;
        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }
}

/// Build the hydrated response, dropping lines whose product is gone.
fn render(cart: &Cart, products: &HashMap<ProductId, Product>) -> CartView {
    let items = cart
        .items
        .iter()
        .filter_map(|line| {
            products.get(&line.product_id).map(|product| CartLineView {
                product: product.clone(),
                quantity: line.quantity,
                added_at: line.added_at,
            })
        })
        .collect();

    CartView {
        items,
        updated_at: cart.updated_at,
    }
}
