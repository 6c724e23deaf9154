//! Account service.
//!
//! Registration, login, profile and password management on top of the user
//! repository, with Argon2id password hashing.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use copperleaf_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{Address, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Account service.
///
/// Handles registration, login, profile edits, password changes, and account
/// removal.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }

        let email = Email::parse(email)?;

        let password = password.trim();
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, phone)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Unknown email and wrong password are deliberately indistinguishable.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.trim(), &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Update a user's name and/or phone, and optionally append a shipping
    /// address to their saved list.
    ///
    /// An address matching an already-saved one by street + postal code is
    /// silently skipped.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: Option<&str>,
        phone: Option<&str>,
        address: Option<Address>,
    ) -> Result<User, AuthError> {
        let mut user = self
            .users
            .update_profile(user_id, name, phone)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        if let Some(address) = address
            && !user.addresses.iter().any(|a| a.is_same_destination(&address))
        {
            user.addresses.push(address);
            self.users.set_addresses(user_id, &user.addresses).await?;
        }

        Ok(user)
    }

    /// Append a shipping address to the user's saved list unless one with
    /// the same street + postal code is already present.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn save_address_if_new(
        &self,
        user_id: UserId,
        address: &Address,
    ) -> Result<(), AuthError> {
        let mut user = self.get_user(user_id).await?;

        if user.addresses.iter().any(|a| a.is_same_destination(address)) {
            return Ok(());
        }

        user.addresses.push(address.clone());
        self.users.set_addresses(user_id, &user.addresses).await?;
        Ok(())
    }

    /// Change a user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password is wrong.
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet requirements.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let current_password = current_password.trim();
        let new_password = new_password.trim();

        validate_password(new_password)?;

        let hash = self
            .users
            .get_password_hash(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(current_password, &hash)?;

        let new_hash = hash_password(new_password)?;
        self.users.set_password_hash(user_id, &new_hash).await?;

        Ok(())
    }

    /// Delete a user's account. Cart, wishlist, and orders cascade.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn delete_account(&self, user_id: UserId) -> Result<(), AuthError> {
        let deleted = self.users.delete(user_id).await?;
        if !deleted {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter42").unwrap();
        assert!(verify_password("hunter42", &hash).is_ok());
        assert!(matches!(
            verify_password("hunter43", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("hunter42").unwrap();
        let b = hash_password("hunter42").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longer").is_ok());
    }

    #[test]
    fn test_garbage_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
