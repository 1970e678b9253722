//! Bearer token repository.
//!
//! Each user has at most one active token. Login returns the existing token
//! if one is present (so concurrent sessions share it); logout deletes it,
//! invalidating every copy.

use sqlx::PgPool;

use bazaar_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Repository for bearer tokens.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's token, inserting `candidate` if they have none.
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing token on
    /// conflict, so this is a single atomic round trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(
        &self,
        user_id: UserId,
        candidate: &str,
    ) -> Result<String, RepositoryError> {
        let (token,): (String,) = sqlx::query_as(
            "INSERT INTO shop.auth_token AS t (user_id, token)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET token = t.token
             RETURNING token",
        )
        .bind(user_id)
        .bind(candidate)
        .fetch_one(self.pool)
        .await?;

        Ok(token)
    }

    /// Resolve a bearer token to its user.
    ///
    /// Returns `None` for unknown tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_user(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.role, u.created_at, u.updated_at
             FROM shop.auth_token t
             JOIN shop.app_user u ON u.id = t.user_id
             WHERE t.token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Delete the user's token, if any. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_for_user(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.auth_token WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
