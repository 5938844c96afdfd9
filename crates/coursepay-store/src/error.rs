//! Error types for coursepay storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Another user already has this username.
    #[error("username already exists")]
    DuplicateUsername,

    /// Another user already has this email.
    #[error("email already registered")]
    DuplicateEmail,

    /// A payment with the same gateway identifier already exists.
    #[error("duplicate payment: {field} already recorded")]
    DuplicatePayment {
        /// Which unique column collided.
        field: &'static str,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<coursepay_core::CoreError> for StoreError {
    fn from(err: coursepay_core::CoreError) -> Self {
        Self::Serialization(err.to_string())
    }
}
