//! Contact-form message domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use copperleaf_core::{ContactId, ContactStatus};

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}
