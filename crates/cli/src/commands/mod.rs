//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Repository error from the server crate.
    #[error("repository error: {0}")]
    Repository(#[from] copperleaf_server::db::RepositoryError),
}

/// Connect to the database named by the environment.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("COPPERLEAF_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("COPPERLEAF_DATABASE_URL"))?;

    let pool = copperleaf_server::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
