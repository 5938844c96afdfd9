//! Deadline wrapper for gateway calls.
//!
//! The whole request is also bounded by the router's `TimeoutLayer`. Gateway
//! calls get a shorter deadline so that a hung call fails inside the handler,
//! where the failure can still be recorded, instead of the request being
//! dropped mid-flight.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{Order, OrderRequest};
use super::{GatewayError, PaymentGateway};

/// A gateway whose network calls fail with [`GatewayError::Timeout`] after a
/// fixed deadline.
pub struct TimeoutGateway {
    inner: Arc<dyn PaymentGateway>,
    timeout: Duration,
}

impl TimeoutGateway {
    /// Wrap `inner`, bounding each call by `timeout`.
    #[must_use]
    pub fn new(inner: Arc<dyn PaymentGateway>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl PaymentGateway for TimeoutGateway {
    fn key_id(&self) -> &str {
        self.inner.key_id()
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order, GatewayError> {
        tokio::time::timeout(self.timeout, self.inner.create_order(request))
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))?
    }

    async fn fetch_order(&self, order_id: &str) -> Result<Order, GatewayError> {
        tokio::time::timeout(self.timeout, self.inner.fetch_order(order_id))
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))?
    }

    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError> {
        self.inner
            .verify_payment_signature(order_id, payment_id, signature)
    }
}
