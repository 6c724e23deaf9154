//! Bearer-token signing and verification.
//!
//! Stateless HS256 JWTs carry the authenticated identity between requests.
//! Verification distinguishes an expired token from an otherwise invalid one
//! so the client can show "session expired" instead of "please log in".

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use copperleaf_core::UserId;

/// Token issuer claim.
const ISSUER: &str = "copperleaf";

/// Errors from signing or verifying a bearer token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// The token failed verification for any other reason.
    #[error("invalid token")]
    Invalid,

    /// Signing a new token failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims for storefront access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Email address.
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// JWT ID.
    pub jti: String,
}

impl Claims {
    fn new(user_id: UserId, email: String, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours);

        Self {
            sub: user_id.to_string(),
            email,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Returns the user ID carried in the subject claim.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the subject isn't a valid ID.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_hours", &self.ttl_hours)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            ttl_hours,
        }
    }

    /// Issue a signed token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, email.to_owned(), self.ttl_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token and
    /// `TokenError::Invalid` for any other verification failure.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_owned()), 168)
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let tokens = service("k9$wQz7!pXv4@nTr2#bLm8^cJf5&hYd3");

        let token = tokens.issue(UserId::new(42), "shopper@example.com").unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), UserId::new(42));
        assert_eq!(claims.email, "shopper@example.com");
        assert_eq!(claims.iss, "copperleaf");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = service("k9$wQz7!pXv4@nTr2#bLm8^cJf5&hYd3");

        assert!(matches!(
            tokens.validate("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = service("first-signing-secret-0123456789ab");
        let verifier = service("other-signing-secret-0123456789ab");

        let token = signer.issue(UserId::new(1), "shopper@example.com").unwrap();
        assert!(matches!(
            verifier.validate(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_expired_token_distinguishable() {
        // TTL of -1 hour produces an already-expired token.
        let tokens = TokenService::new(
            &SecretString::from("k9$wQz7!pXv4@nTr2#bLm8^cJf5&hYd3".to_owned()),
            -1,
        );

        let token = tokens.issue(UserId::new(1), "shopper@example.com").unwrap();
        assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
    }
}
