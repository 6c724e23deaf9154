//! Contact-message repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use copperleaf_core::{ContactId, ContactStatus};

use super::RepositoryError;
use crate::models::contact::ContactMessage;

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i32,
    name: String,
    email: String,
    subject: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let status: ContactStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid contact status in database: {e}"))
        })?;

        Ok(Self {
            id: ContactId::new(row.id),
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            status,
            created_at: row.created_at,
        })
    }
}

const CONTACT_COLUMNS: &str = "id, name, email, subject, message, status, created_at";

/// Repository for contact-form messages.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a submitted message with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "INSERT INTO contact_messages (name, email, subject, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(subject)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// All messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ContactMessage::try_from).collect()
    }

    /// Mark a message as read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message doesn't exist.
    pub async fn mark_read(&self, id: ContactId) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "UPDATE contact_messages SET status = 'read' WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a message.
    ///
    /// # Returns
    ///
    /// Returns `true` if the message was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ContactId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
