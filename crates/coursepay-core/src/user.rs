//! Registered users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::UserId;

/// bcrypt work factor used when none is configured.
pub const DEFAULT_PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;

/// A registered user.
///
/// Created at registration and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Unique login handle.
    pub username: String,
    /// Unique email address, used to log in.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user, hashing the password with the default bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PasswordHash` if hashing fails.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self> {
        Self::with_cost(username, email, password, DEFAULT_PASSWORD_COST)
    }

    /// Create a user with an explicit bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PasswordHash` if the cost is out of range.
    pub fn with_cost(
        username: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        cost: u32,
    ) -> Result<Self> {
        Ok(Self {
            id: UserId::generate(),
            username: username.into(),
            email: email.into(),
            password_hash: bcrypt::hash(password, cost)?,
            created_at: Utc::now(),
        })
    }

    /// Check a candidate password against the stored hash.
    ///
    /// A malformed stored hash never matches.
    #[must_use]
    pub fn check_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
