//! Database operations for the storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` - Identity, credentials, saved addresses (JSONB array)
//! - `products` - Catalog records
//! - `carts` - One document row per user; line items in JSONB plus a
//!   revision counter for conditional writes
//! - `wishlists` - One document row per user, same write discipline
//! - `orders` - Immutable snapshots with a mutable status column
//! - `contact_messages` - Contact-form submissions
//!
//! All queries use the runtime-checked sqlx API so the crate builds without a
//! live database; rows decode into private `*Row` structs that convert into
//! the domain types in [`crate::models`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p copperleaf-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod carts;
pub mod contact;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlists;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
