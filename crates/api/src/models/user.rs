//! User domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{Email, UserId, UserRole, Username};

/// A registered account.
///
/// Password hashes and tokens are never part of this type; they live in
/// separate tables and are only touched by the auth service.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique handle used to log in.
    pub username: Username,
    /// Optional contact email.
    pub email: Option<Email>,
    /// Buyer or seller.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
