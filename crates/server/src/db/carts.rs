//! Cart repository.
//!
//! Carts are single-document rows: the whole line list is written back on
//! every mutation, conditional on the revision read. A save that returns
//! `false` lost a concurrent race and the caller must re-read and retry.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use copperleaf_core::UserId;

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine};

#[derive(sqlx::FromRow)]
struct CartRow {
    user_id: i32,
    items: Json<Vec<CartLine>>,
    revision: i64,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            revision: row.revision,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart document operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's cart document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT user_id, items, revision, updated_at FROM carts WHERE user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// Create an empty cart for a user if none exists yet.
    ///
    /// Racing creations are harmless: the insert is a no-op when a row is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_if_missing(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Persist the whole document, conditional on the revision it was read at.
    ///
    /// # Returns
    ///
    /// `true` if the write landed; `false` if the revision moved underneath
    /// us and the caller must re-read and retry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn save(&self, cart: &Cart) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE carts
             SET items = $2, revision = revision + 1, updated_at = now()
             WHERE user_id = $1 AND revision = $3",
        )
        .bind(cart.user_id.as_i32())
        .bind(Json(&cart.items))
        .bind(cart.revision)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
