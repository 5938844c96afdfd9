//! Payment gateway integration.
//!
//! The gateway handles:
//! - Order creation (the intended charge, shown in the checkout widget)
//! - Order lookup (the server-side source of truth for amount and course)
//! - Payment signatures (proof that a checkout callback came from the gateway)
//!
//! Handlers only see the [`PaymentGateway`] trait; [`RazorpayClient`] is the
//! production implementation.

pub mod client;
pub mod memory;
pub mod timeout;
pub mod types;

use async_trait::async_trait;

pub use client::RazorpayClient;
pub use memory::InMemoryGateway;
pub use timeout::TimeoutGateway;
pub use types::*;

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned an error.
    #[error("Razorpay API error: {code} - {description}")]
    Api {
        /// Error code.
        code: String,
        /// Error description.
        description: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The call did not finish within the deadline.
    #[error("Gateway call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The payment signature does not match.
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Operations the service needs from a hosted payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key handed to the browser's checkout widget.
    fn key_id(&self) -> &str;

    /// Create an order for the given amount.
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, GatewayError>;

    /// Fetch an order by ID.
    async fn fetch_order(&self, order_id: &str) -> Result<Order, GatewayError>;

    /// Check a checkout callback's signature.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidSignature` if it does not match.
    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError>;
}
