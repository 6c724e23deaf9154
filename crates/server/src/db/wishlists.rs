//! Wishlist repository.
//!
//! Same document shape and write discipline as the cart repository: one row
//! per user, JSONB list, revision-conditional writes.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use copperleaf_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::wishlist::Wishlist;

#[derive(sqlx::FromRow)]
struct WishlistRow {
    user_id: i32,
    product_ids: Json<Vec<ProductId>>,
    revision: i64,
    updated_at: DateTime<Utc>,
}

impl From<WishlistRow> for Wishlist {
    fn from(row: WishlistRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            product_ids: row.product_ids.0,
            revision: row.revision,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for wishlist document operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's wishlist document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Wishlist>, RepositoryError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            "SELECT user_id, product_ids, revision, updated_at FROM wishlists WHERE user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Wishlist::from))
    }

    /// Create an empty wishlist for a user if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_if_missing(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO wishlists (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
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
    pub async fn save(&self, wishlist: &Wishlist) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE wishlists
             SET product_ids = $2, revision = revision + 1, updated_at = now()
             WHERE user_id = $1 AND revision = $3",
        )
        .bind(wishlist.user_id.as_i32())
        .bind(Json(&wishlist.product_ids))
        .bind(wishlist.revision)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
