//! Authentication service.
//!
//! Password registration/login and DB-backed bearer tokens.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sqlx::PgPool;

use bazaar_core::{Email, UserId, UserRole, Username};

use crate::db::RepositoryError;
use crate::db::tokens::TokenRepository;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Number of random bytes in a bearer token.
const TOKEN_BYTES: usize = 32;

/// Authentication service.
///
/// Handles registration, login, logout, and token issuance. Passwords are
/// hashed with argon2; tokens are random and stored server-side, so logout
/// revokes them immediately.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: TokenRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens: TokenRepository::new(pool),
        }
    }

    /// Register a new buyer account and issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername`/`InvalidEmail` on malformed
    /// input, `AuthError::WeakPassword` if the password is too short, and
    /// `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn register(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let username = Username::parse(username)?;
        let email = email.map(Email::parse).transpose()?;

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create_with_password(&username, email.as_ref(), UserRole::Buyer, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.get_or_create(user.id, &generate_token()).await?;

        Ok((user, token))
    }

    /// Login with username and password, issuing (or reusing) the bearer
    /// token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username or password is
    /// wrong. Malformed usernames map to the same error so the response does
    /// not reveal which part failed.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.get_or_create(user.id, &generate_token()).await?;

        Ok((user, token))
    }

    /// Invalidate the user's bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn logout(&self, user_id: UserId) -> Result<(), AuthError> {
        self.tokens.delete_for_user(user_id).await?;
        Ok(())
    }
}

/// Generate a fresh bearer token: 32 random bytes, base64 URL-safe.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Hash a password for out-of-band account creation (CLI tooling).
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` or `AuthError::PasswordHash`.
pub fn hash_password_checked(password: &str) -> Result<String, AuthError> {
    validate_password(password)?;
    hash_password(password)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longer").is_ok());
    }

    #[test]
    fn test_generated_tokens_are_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(
            a.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(a.len(), 43);
    }
}
