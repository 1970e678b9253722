//! User repository.

use sqlx::PgPool;

use bazaar_core::{Email, UserId, UserRole, Username};

use super::RepositoryError;
use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, role, created_at, updated_at";

/// Repository for account rows and their password hashes.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM shop.app_user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM shop.app_user WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user with a username, optional email, role, and password
    /// hash. The user row and its password row are written in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        username: &Username,
        email: Option<&Email>,
        role: UserRole,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO shop.app_user (username, email, role)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        sqlx::query("INSERT INTO shop.user_password (user_id, password_hash) VALUES ($1, $2)")
            .bind(user.id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user and their password hash by username.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(
            "SELECT u.id, u.username, u.email, u.role, u.created_at, u.updated_at,
                    p.password_hash
             FROM shop.app_user u
             JOIN shop.user_password p ON u.id = p.user_id
             WHERE u.username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                User {
                    id: r.id,
                    username: r.username,
                    email: r.email,
                    role: r.role,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                },
                r.password_hash,
            )
        }))
    }

    /// Update a user's email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_email(
        &self,
        id: UserId,
        email: Option<&Email>,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE shop.app_user
             SET email = $2, updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        user.ok_or(RepositoryError::NotFound)
    }

    /// Promote an existing user to the seller role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has that username.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn promote_to_seller(&self, username: &Username) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE shop.app_user
             SET role = 'seller', updated_at = now()
             WHERE username = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        user.ok_or(RepositoryError::NotFound)
    }
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    id: UserId,
    username: Username,
    email: Option<Email>,
    role: UserRole,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    password_hash: String,
}
