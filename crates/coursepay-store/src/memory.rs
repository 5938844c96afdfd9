//! In-memory storage implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use coursepay_core::{Payment, User, UserId};

use crate::error::{Result, StoreError};
use crate::Store;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    payments: Vec<Payment>,
}

/// A thread-safe in-memory store.
///
/// Uniqueness checks and the insert happen under one write lock, so two
/// concurrent registrations with the same email cannot both succeed.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<()> {
        let mut tables = self.tables.write().await;

        if tables
            .payments
            .iter()
            .any(|p| p.gateway_order_id == payment.gateway_order_id)
        {
            return Err(StoreError::DuplicatePayment {
                field: "gateway_order_id",
            });
        }
        if tables
            .payments
            .iter()
            .any(|p| p.gateway_payment_id == payment.gateway_payment_id)
        {
            return Err(StoreError::DuplicatePayment {
                field: "gateway_payment_id",
            });
        }

        tables.payments.push(payment.clone());
        Ok(())
    }

    async fn list_payments_by_user(&self, user_id: &UserId) -> Result<Vec<Payment>> {
        let tables = self.tables.read().await;
        let mut payments: Vec<_> = tables
            .payments
            .iter()
            .filter(|p| p.user_id.as_ref() == Some(user_id))
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn count_payments(&self) -> Result<u64> {
        let tables = self.tables.read().await;
        Ok(tables.payments.len() as u64)
    }
}
