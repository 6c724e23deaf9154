//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always JSON with a `message`
//! field, plus an `errors` object enumerating invalid fields on validation
//! failures.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::orders::OrderError;
use crate::services::token::TokenError;
use crate::services::wishlist::WishlistError;

/// One invalid field in a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// JSON error body sent to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, String>>,
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed field validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Account operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Wishlist operation failed.
    #[error("wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Order operation failed.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// Bearer-token operation failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status plus client-facing message (and field errors, if any).
    fn parts(&self) -> (StatusCode, String, Option<&[FieldError]>) {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_owned(),
                Some(errors.as_slice()),
            ),
            Self::Auth(err) => {
                let status = match err {
                    AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    AuthError::UserNotFound => StatusCode::NOT_FOUND,
                    AuthError::UserAlreadyExists
                    | AuthError::WeakPassword(_)
                    | AuthError::InvalidEmail(_)
                    | AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
                    AuthError::Repository(_) | AuthError::PasswordHash => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let message = match err {
                    AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                    AuthError::UserNotFound => "User not found".to_owned(),
                    AuthError::UserAlreadyExists => "User already exists".to_owned(),
                    AuthError::WeakPassword(msg) => msg.clone(),
                    AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                    AuthError::MissingField(field) => format!("Please provide {field}"),
                    AuthError::Repository(_) | AuthError::PasswordHash => {
                        "Internal server error".to_owned()
                    }
                };
                (status, message, None)
            }
            Self::Cart(err) => {
                let status = match err {
                    CartError::ProductNotFound
                    | CartError::CartNotFound
                    | CartError::ItemNotInCart => StatusCode::NOT_FOUND,
                    CartError::InvalidQuantity => StatusCode::BAD_REQUEST,
                    CartError::ConcurrentUpdate => StatusCode::CONFLICT,
                    CartError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match err {
                    CartError::ProductNotFound => "Product not found".to_owned(),
                    CartError::CartNotFound => "Cart not found".to_owned(),
                    CartError::ItemNotInCart => "Item not in cart".to_owned(),
                    CartError::InvalidQuantity | CartError::ConcurrentUpdate => err.to_string(),
                    CartError::Repository(_) => "Internal server error".to_owned(),
                };
                (status, message, None)
            }
            Self::Wishlist(err) => {
                let status = match err {
                    WishlistError::ProductNotFound | WishlistError::WishlistNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    // Duplicate saves are a 400 on this API, not a 409.
                    WishlistError::AlreadyInWishlist => StatusCode::BAD_REQUEST,
                    WishlistError::ConcurrentUpdate => StatusCode::CONFLICT,
                    WishlistError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match err {
                    WishlistError::ProductNotFound => "Product not found".to_owned(),
                    WishlistError::WishlistNotFound => "Wishlist not found".to_owned(),
                    WishlistError::AlreadyInWishlist => "Item already in wishlist".to_owned(),
                    WishlistError::ConcurrentUpdate => err.to_string(),
                    WishlistError::Repository(_) => "Internal server error".to_owned(),
                };
                (status, message, None)
            }
            Self::Order(err) => match err {
                OrderError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_owned(),
                    Some(errors.as_slice()),
                ),
                OrderError::NotFound => {
                    (StatusCode::NOT_FOUND, "Order not found".to_owned(), None)
                }
                OrderError::InvalidTransition { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string(), None)
                }
                OrderError::ConcurrentUpdate => (StatusCode::CONFLICT, err.to_string(), None),
                OrderError::Repository(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                    None,
                ),
            },
            Self::Token(err) => match err {
                TokenError::Expired => (
                    StatusCode::UNAUTHORIZED,
                    "Session expired, please log in again".to_owned(),
                    None,
                ),
                TokenError::Invalid => {
                    (StatusCode::UNAUTHORIZED, "Invalid token".to_owned(), None)
                }
                TokenError::Signing(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                    None,
                ),
            },
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
                None,
            ),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found"), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, field_errors) = self.parts();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let errors = field_errors.map(|list| {
            list.iter()
                .map(|e| (e.field.clone(), e.message.clone()))
                .collect()
        });

        (status, Json(ErrorBody { message, errors })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product".to_string());
        assert_eq!(err.to_string(), "not found: Product");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "bad request: invalid input");
    }

    #[test]
    fn test_basic_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Validation(vec![FieldError::new("tax", "required")])),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        // Duplicate registration is a 400-class failure, not a 500.
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_aggregator_status_codes() {
        assert_eq!(
            get_status(AppError::Cart(CartError::ProductNotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::ConcurrentUpdate)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Wishlist(WishlistError::AlreadyInWishlist)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_token_status_codes() {
        assert_eq!(
            get_status(AppError::Token(TokenError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Token(TokenError::Invalid)),
            StatusCode::UNAUTHORIZED
        );
    }
}
