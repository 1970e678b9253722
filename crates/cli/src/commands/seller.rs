//! Seller account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new seller account
//! bazaar-cli seller create -u storefront1 -p 'secret-password' -e seller@example.com
//!
//! # Promote an existing buyer to seller
//! bazaar-cli seller promote -u priya
//! ```
//!
//! Seller is not a self-service role: accounts registered through the API are
//! always buyers, and only this tooling grants the seller role.

use thiserror::Error;

use bazaar_api::db::users::UserRepository;
use bazaar_api::db::{RepositoryError, create_pool};
use bazaar_api::services::auth::hash_password_checked;
use bazaar_core::{Email, EmailError, UserRole, Username, UsernameError};

/// Errors that can occur during seller operations.
#[derive(Debug, Error)]
pub enum SellerError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password rejected (too short) or hashing failed.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Username already taken.
    #[error("User already exists: {0}")]
    UserExists(String),

    /// No user with that username.
    #[error("No such user: {0}")]
    NoSuchUser(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepositoryError> for SellerError {
    fn from(e: RepositoryError) -> Self {
        Self::Database(e.to_string())
    }
}

/// Create a new seller account.
///
/// # Errors
///
/// Returns `SellerError` if the input is invalid, the username is taken, or
/// the database operation fails.
pub async fn create(username: &str, email: Option<&str>, password: &str) -> Result<i32, SellerError> {
    let username = Username::parse(username)?;
    let email = email.map(Email::parse).transpose()?;
    let password_hash =
        hash_password_checked(password).map_err(|e| SellerError::InvalidPassword(e.to_string()))?;

    let database_url = super::database_url().map_err(SellerError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url)
        .await
        .map_err(|e| SellerError::Database(e.to_string()))?;

    tracing::info!("Creating seller account: {}", username);

    let user = UserRepository::new(&pool)
        .create_with_password(&username, email.as_ref(), UserRole::Seller, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => SellerError::UserExists(username.to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        "Seller created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );

    Ok(user.id.as_i32())
}

/// Promote an existing user to the seller role.
///
/// # Errors
///
/// Returns `SellerError::NoSuchUser` if no user has that username, or
/// `SellerError::Database` for database failures.
pub async fn promote(username: &str) -> Result<(), SellerError> {
    let username = Username::parse(username)?;

    let database_url = super::database_url().map_err(SellerError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url)
        .await
        .map_err(|e| SellerError::Database(e.to_string()))?;

    let user = UserRepository::new(&pool)
        .promote_to_seller(&username)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => SellerError::NoSuchUser(username.to_string()),
            other => other.into(),
        })?;

    tracing::info!("User {} is now a seller (ID: {})", user.username, user.id);

    Ok(())
}
