/// User model
///
/// Users are created at registration by the auth collaborator, which owns
/// password hashing and credential rotation. The task core only reads the
/// id (for ownership) and the username (for the activity feed); the
/// password hash never leaves the database through this crate.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, identity for task ownership
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// User id
    pub id: i32,

    /// Unique username
    pub username: String,

    /// Unique email address
    pub email: String,

    /// When the user registered
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
