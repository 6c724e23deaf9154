//! Account route handlers.
//!
//! Register and login issue a bearer token alongside a public view of the
//! user; the remaining routes require the token.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use copperleaf_core::UserId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::user::{Address, User};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Profile update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Shipping address to append to the saved list (deduped by
    /// street + postal code).
    #[serde(default)]
    pub address: Option<Address>,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Public view of a user, as returned with a freshly issued token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.to_string(),
            phone: user.phone.clone(),
        }
    }
}

/// Token plus user, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Full profile view, including saved addresses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.to_string(),
            phone: user.phone,
            addresses: user.addresses,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account and issue a bearer token.
///
/// POST /api/auth/register
#[instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let name = req.name.as_deref().ok_or(AuthError::MissingField("name"))?;
    let email = req
        .email
        .as_deref()
        .ok_or(AuthError::MissingField("email"))?;
    let password = req
        .password
        .as_deref()
        .ok_or(AuthError::MissingField("password"))?;

    let auth = AuthService::new(state.pool());
    let user = auth
        .register(name, email, password, req.phone.as_deref())
        .await?;

    let token = state.tokens().issue(user.id, user.email.as_str())?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserSummary::from(&user),
        }),
    ))
}

/// Verify credentials and issue a bearer token.
///
/// POST /api/auth/login
#[instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = req
        .email
        .as_deref()
        .ok_or(AuthError::MissingField("email"))?;
    let password = req
        .password
        .as_deref()
        .ok_or(AuthError::MissingField("password"))?;

    let auth = AuthService::new(state.pool());
    let user = auth.login(email, password).await?;

    let token = state.tokens().issue(user.id, user.email.as_str())?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

/// Return the authenticated user's profile.
///
/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProfileResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.get_user(user.id).await?;
    Ok(Json(user.into()))
}

/// Update name/phone and optionally append a saved address.
///
/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let auth = AuthService::new(state.pool());
    let updated = auth
        .update_profile(user.id, req.name.as_deref(), req.phone.as_deref(), req.address)
        .await?;
    Ok(Json(updated.into()))
}

/// Rotate the password after verifying the current one.
///
/// POST /api/auth/change-password
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let (Some(current), Some(new)) = (req.current_password, req.new_password) else {
        return Err(AppError::BadRequest(
            "Please provide both current and new password".to_owned(),
        ));
    };

    let auth = AuthService::new(state.pool());
    auth.change_password(user.id, &current, &new).await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}

/// Delete the authenticated user's account. Cart, wishlist, and orders go
/// with it.
///
/// DELETE /api/auth/delete-account
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_account(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool());
    auth.delete_account(user.id).await?;

    Ok(Json(MessageResponse {
        message: "Account deleted successfully",
    }))
}
