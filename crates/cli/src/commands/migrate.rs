//! Database migration command.
//!
//! Runs the server crate's sqlx migrations against the configured database.

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
