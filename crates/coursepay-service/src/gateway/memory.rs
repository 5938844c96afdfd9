//! In-process gateway.
//!
//! Behaves like the hosted API from the service's point of view: orders get
//! gateway-style ids and are remembered for later fetches, and payment
//! signatures use the same HMAC scheme with a local secret. Used by the test
//! suites; [`InMemoryGateway::sign`] plays the part of the checkout widget.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::types::{Order, OrderRequest};
use super::{GatewayError, PaymentGateway};
use crate::crypto::{constant_time_eq, payment_signature};

/// Key id reported to the browser.
pub const IN_MEMORY_KEY_ID: &str = "rzp_test_inmemory";

const IN_MEMORY_SECRET: &str = "inmemory_secret";

#[derive(Default)]
struct Ledger {
    requests: Vec<OrderRequest>,
    orders: Vec<Order>,
}

/// A gateway that keeps its orders in memory.
#[derive(Default)]
pub struct InMemoryGateway {
    ledger: Mutex<Ledger>,
    fetches: AtomicUsize,
    fail_orders: bool,
    fail_fetches: bool,
    fetch_delay: Option<Duration>,
}

impl InMemoryGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `create_order` call fail.
    #[must_use]
    pub fn failing_orders(mut self) -> Self {
        self.fail_orders = true;
        self
    }

    /// Make every `fetch_order` call fail.
    #[must_use]
    pub fn failing_fetches(mut self) -> Self {
        self.fail_fetches = true;
        self
    }

    /// Make every `fetch_order` call stall for `delay` first.
    #[must_use]
    pub fn slow_fetches(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Register an order directly, bypassing `create_order`.
    pub fn insert_order(&self, order: Order) {
        self.ledger().orders.push(order);
    }

    /// Signature the checkout widget would return for this payment.
    #[must_use]
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        payment_signature(IN_MEMORY_SECRET, order_id, payment_id)
    }

    /// Requests received by `create_order`, in order.
    #[must_use]
    pub fn created_orders(&self) -> Vec<OrderRequest> {
        self.ledger().requests.clone()
    }

    /// Number of `fetch_order` calls.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    fn key_id(&self) -> &str {
        IN_MEMORY_KEY_ID
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order, GatewayError> {
        let mut ledger = self.ledger();
        ledger.requests.push(request.clone());

        if self.fail_orders {
            return Err(GatewayError::Api {
                code: "SERVER_ERROR".into(),
                description: "order creation unavailable".into(),
            });
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        let order = Order {
            id: format!("order_{}", &id[..14]),
            amount: request.amount,
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: Some("created".into()),
            notes: serde_json::to_value(&request.notes)?,
            created_at: chrono::Utc::now().timestamp(),
        };
        ledger.orders.push(order.clone());

        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<Order, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_fetches {
            return Err(GatewayError::Api {
                code: "SERVER_ERROR".into(),
                description: "order lookup unavailable".into(),
            });
        }

        self.ledger()
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| GatewayError::Api {
                code: "BAD_REQUEST_ERROR".into(),
                description: "The id provided does not exist".into(),
            })
    }

    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError> {
        if constant_time_eq(&self.sign(order_id, payment_id), signature) {
            Ok(())
        } else {
            Err(GatewayError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OrderNotes;

    fn request() -> OrderRequest {
        OrderRequest {
            amount: 79_900,
            currency: "INR".into(),
            receipt: "receipt_ml_00000000".into(),
            notes: OrderNotes {
                course_id: "ml".into(),
                course_name: "Machine Learning in Depth".into(),
            },
        }
    }

    #[tokio::test]
    async fn created_orders_can_be_fetched() {
        let gateway = InMemoryGateway::new();
        let order = gateway.create_order(&request()).await.unwrap();
        assert!(order.id.starts_with("order_"));

        let fetched = gateway.fetch_order(&order.id).await.unwrap();
        assert_eq!(fetched.course_id(), Some("ml"));
        assert_eq!(fetched.amount, 79_900);
        assert_eq!(gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn unknown_orders_are_errors() {
        let gateway = InMemoryGateway::new();
        assert!(gateway.fetch_order("order_nope").await.is_err());
    }

    #[test]
    fn signatures() {
        let gateway = InMemoryGateway::new();
        let sig = gateway.sign("order_1", "pay_1");
        assert!(gateway.verify_payment_signature("order_1", "pay_1", &sig).is_ok());
        assert!(gateway.verify_payment_signature("order_1", "pay_9", &sig).is_err());
    }
}
