//! Application state.

use std::sync::Arc;
use std::time::Duration;

use coursepay_core::{Catalog, DEFAULT_PASSWORD_COST};
use coursepay_store::Store;

use crate::config::ServiceConfig;
use crate::gateway::{PaymentGateway, RazorpayClient, TimeoutGateway};
use crate::session::SessionKeys;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Courses on sale.
    pub catalog: Arc<Catalog>,

    /// Payment gateway (optional), bounded by [`ServiceConfig::gateway_timeout`].
    pub gateway: Option<Arc<dyn PaymentGateway>>,

    /// Session cookie signing keys.
    pub sessions: SessionKeys,

    /// bcrypt cost for new password hashes.
    pub password_cost: u32,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state with the built-in catalog.
    ///
    /// The Razorpay client is built from `config` when both credentials are set.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        let gateway_timeout = config.gateway_timeout();
        let gateway = config
            .razorpay_key_id
            .as_ref()
            .zip(config.razorpay_key_secret.as_ref())
            .and_then(|(key_id, key_secret)| {
                match RazorpayClient::new(key_id, key_secret, &config.razorpay_api_url) {
                    Ok(client) => {
                        tracing::info!(
                            key_id = %key_id,
                            timeout = ?gateway_timeout,
                            "Razorpay integration enabled"
                        );
                        let client = client.with_timeout(gateway_timeout);
                        Some(bounded(Arc::new(client), gateway_timeout))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create Razorpay client");
                        None
                    }
                }
            });

        if gateway.is_none() {
            tracing::warn!("Razorpay not configured - checkout will not be available");
        }

        let sessions = SessionKeys::new(
            &config.session_secret,
            Duration::from_secs(config.session_ttl_seconds),
        );

        Self {
            store,
            catalog: Arc::new(Catalog::builtin()),
            gateway,
            sessions,
            password_cost: DEFAULT_PASSWORD_COST,
            config,
        }
    }

    /// Replace the payment gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = Some(bounded(gateway, self.config.gateway_timeout()));
        self
    }

    /// Use a different bcrypt cost (tests use the minimum).
    #[must_use]
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Check if a payment gateway is configured.
    #[must_use]
    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    /// The gateway as a trait object reference.
    #[must_use]
    pub fn gateway(&self) -> Option<&dyn PaymentGateway> {
        self.gateway.as_deref()
    }
}

fn bounded(gateway: Arc<dyn PaymentGateway>, timeout: Duration) -> Arc<dyn PaymentGateway> {
    Arc::new(TimeoutGateway::new(gateway, timeout))
}
