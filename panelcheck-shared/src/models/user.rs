/// User model
///
/// Users are created at registration and are immutable afterwards. Email
/// addresses are normalized to lowercase before they reach storage, which is
/// what makes lookups and uniqueness case-insensitive in both backends.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email TEXT NOT NULL,
///     password_hash TEXT NOT NULL
/// );
/// CREATE UNIQUE INDEX users_email_key ON users (LOWER(email));
/// ```

use serde::{Deserialize, Serialize};

/// A registered user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Sequential user ID
    pub id: i64,

    /// Lowercased email address, unique across all users
    pub email: String,

    /// Argon2id password hash in PHC string format
    ///
    /// Never serialized into API responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (normalized by the store)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

/// Normalizes an email address for storage and lookup
///
/// # Example
///
/// ```
/// use panelcheck_shared::models::user::normalize_email;
///
/// assert_eq!(normalize_email("  Sparky@Example.COM "), "sparky@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
