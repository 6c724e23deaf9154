//! Authentication extractor.
//!
//! Protected handlers take [`CurrentUser`], which reads the
//! `Authorization: Bearer <token>` header, verifies the token, and resolves
//! it to a user identity. A missing credential and an invalid or expired one
//! are distinguishable rejections so the client can show "please log in"
//! versus "session expired".

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use copperleaf_core::{Email, UserId};

use crate::services::token::TokenError;
use crate::state::AppState;

/// The authenticated identity resolved from the bearer credential.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address, as carried in the token.
    pub email: Email,
}

/// Rejection returned when the bearer credential is missing or fails
/// verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header on the request.
    MissingCredential,
    /// The credential failed signature or claim verification.
    InvalidCredential,
    /// The credential was valid once but has expired.
    ExpiredCredential,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingCredential => "No auth token",
            Self::InvalidCredential => "Invalid token",
            Self::ExpiredCredential => "Session expired, please log in again",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": message })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthRejection::MissingCredential)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthRejection::MissingCredential)?;

        let claims = state.tokens().validate(token).map_err(|e| match e {
            TokenError::Expired => AuthRejection::ExpiredCredential,
            _ => AuthRejection::InvalidCredential,
        })?;

        let id = claims
            .user_id()
            .map_err(|_| AuthRejection::InvalidCredential)?;
        let email = Email::parse(&claims.email).map_err(|_| AuthRejection::InvalidCredential)?;

        Ok(Self { id, email })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use crate::config::ServerConfig;

    use super::*;

    fn test_state(ttl_hours: i64) -> AppState {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/copperleaf_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            token_secret: SecretString::from("k9$wQz7!pXv4@nTr2#bLm8^cJf5&hYd3"),
            token_ttl_hours: ttl_hours,
            cors_origin: None,
            sentry_dsn: None,
        };
        // Lazy pool: no connection is made until a query runs, and these
        // tests never run one.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/copperleaf_test")
            .unwrap();
        AppState::new(config, pool)
    }

    async fn extract(state: &AppState, header: Option<&str>) -> Result<CurrentUser, AuthRejection> {
        let mut builder = axum::http::Request::builder().uri("/api/cart");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn test_missing_header_rejected_as_missing() {
        let state = test_state(168);
        let result = extract(&state, None).await;
        assert_eq!(result.unwrap_err(), AuthRejection::MissingCredential);
    }

    #[tokio::test]
    async fn test_non_bearer_header_rejected_as_missing() {
        let state = test_state(168);
        let result = extract(&state, Some("Basic dXNlcjpwdw==")).await;
        assert_eq!(result.unwrap_err(), AuthRejection::MissingCredential);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected_as_invalid() {
        let state = test_state(168);
        let result = extract(&state, Some("Bearer not-a-token")).await;
        assert_eq!(result.unwrap_err(), AuthRejection::InvalidCredential);
    }

    #[tokio::test]
    async fn test_expired_token_distinguished_from_invalid() {
        let state = test_state(-1);
        let token = state
            .tokens()
            .issue(UserId::new(1), "shopper@example.com")
            .unwrap();

        let result = extract(&state, Some(&format!("Bearer {token}"))).await;
        assert_eq!(result.unwrap_err(), AuthRejection::ExpiredCredential);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let state = test_state(168);
        let token = state
            .tokens()
            .issue(UserId::new(7), "shopper@example.com")
            .unwrap();

        let user = extract(&state, Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.email.as_str(), "shopper@example.com");
    }
}
