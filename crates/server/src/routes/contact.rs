//! Contact form route handlers.
//!
//! The contact surface is public: submission has no account requirement and
//! the triage routes back the lightweight admin screen.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use copperleaf_core::{ContactId, Email};

use crate::db::RepositoryError;
use crate::db::contact::ContactRepository;
use crate::error::{AppError, Result};
use crate::models::contact::ContactMessage;
use crate::state::AppState;

/// Contact form submission body.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Submission confirmation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmitted {
    pub message: &'static str,
    pub contact_id: ContactId,
}

/// Submit a contact message.
///
/// POST /api/contact
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse> {
    let name = form.name.as_deref().map(str::trim).unwrap_or_default();
    let message = form.message.as_deref().map(str::trim).unwrap_or_default();
    let raw_email = form.email.as_deref().unwrap_or_default();

    if name.is_empty() || raw_email.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest(
            "Please provide name, email, and message".to_owned(),
        ));
    }

    let email = Email::parse(raw_email).map_err(|_| {
        AppError::BadRequest("Please enter a valid email address".to_owned())
    })?;

    let subject = form
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("No subject");

    let saved = ContactRepository::new(state.pool())
        .insert(name, email.as_str(), subject, message)
        .await?;

    tracing::info!(contact_id = %saved.id, "contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ContactSubmitted {
            message: "Message sent successfully! We'll get back to you soon.",
            contact_id: saved.id,
        }),
    ))
}

/// List all messages, newest first.
///
/// GET /api/contact
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>> {
    let messages = ContactRepository::new(state.pool()).list().await?;
    Ok(Json(messages))
}

/// Mark a message as read.
///
/// PATCH /api/contact/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<Json<ContactMessage>> {
    let message = ContactRepository::new(state.pool())
        .mark_read(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Message".to_owned()),
            other => AppError::Database(other),
        })?;
    Ok(Json(message))
}

/// Delete a message.
///
/// DELETE /api/contact/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<Json<serde_json::Value>> {
    let deleted = ContactRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Message".to_owned()));
    }

    Ok(Json(serde_json::json!({
        "message": "Message deleted successfully"
    })))
}
