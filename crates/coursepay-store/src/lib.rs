//! Storage layer for coursepay.
//!
//! This crate persists users and payment attempts behind the [`Store`] trait.
//! Two backends are provided:
//!
//! - [`PgStore`]: PostgreSQL via `sqlx`, schema in `migrations/`
//! - [`MemoryStore`]: in-process, for tests and local runs without a database
//!
//! Uniqueness rules (username, email, gateway order id, gateway payment id)
//! are enforced by both backends and surface as the duplicate variants of
//! [`StoreError`].
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> coursepay_store::Result<()> {
//! use coursepay_core::User;
//! use coursepay_store::{MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! let user = User::new("asha", "asha@example.com", "s3cret")?;
//! store.insert_user(&user).await?;
//!
//! let found = store.find_user_by_email("asha@example.com").await?;
//! assert_eq!(found.map(|u| u.id), Some(user.id));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
pub mod postgres;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use coursepay_core::{Payment, User, UserId};

/// The storage trait defining all database operations.
///
/// Every write is a single insert; the backend's own uniqueness enforcement
/// is what keeps concurrent requests consistent.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicateUsername` if the username is taken.
    /// - `StoreError::DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>>;

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Insert a payment record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicatePayment` if the gateway order id or
    /// payment id is already recorded.
    async fn insert_payment(&self, payment: &Payment) -> Result<()>;

    /// List a user's payments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_payments_by_user(&self, user_id: &UserId) -> Result<Vec<Payment>>;

    /// Total number of payment records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_payments(&self) -> Result<u64>;
}
