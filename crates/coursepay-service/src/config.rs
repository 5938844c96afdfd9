//! Service configuration.

use std::time::Duration;

use crate::gateway::client::DEFAULT_BASE_URL;

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:5001").
    pub listen_addr: String,

    /// PostgreSQL connection string. Unset means the in-memory store.
    pub database_url: Option<String>,

    /// Maximum pooled database connections (default: 5).
    pub database_max_connections: u32,

    /// Razorpay public key id.
    pub razorpay_key_id: Option<String>,

    /// Razorpay key secret.
    pub razorpay_key_secret: Option<String>,

    /// Razorpay API base URL.
    pub razorpay_api_url: String,

    /// Deadline for a single gateway call in seconds (default: 10).
    /// Capped below the request timeout, see [`ServiceConfig::gateway_timeout`].
    pub gateway_timeout_seconds: u64,

    /// Secret used to sign session cookies.
    pub session_secret: String,

    /// Session lifetime in seconds (default: 7 days).
    pub session_ttl_seconds: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// A missing `SECRET_KEY` is replaced by a random per-process secret, so
    /// sessions do not survive a restart.
    #[must_use]
    pub fn from_env() -> Self {
        let session_secret = std::env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("SECRET_KEY not set - using a random session secret");
                random_secret()
            });

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:5001".into()),
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: parsed_var("DATABASE_MAX_CONNECTIONS").unwrap_or(5),
            razorpay_key_id: non_empty_var("RAZORPAY_KEY_ID"),
            razorpay_key_secret: non_empty_var("RAZORPAY_KEY_SECRET"),
            razorpay_api_url: std::env::var("RAZORPAY_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            gateway_timeout_seconds: parsed_var("RAZORPAY_TIMEOUT_SECONDS").unwrap_or(10),
            session_secret,
            session_ttl_seconds: parsed_var("SESSION_TTL_SECONDS").unwrap_or(7 * 24 * 3600),
            max_body_bytes: parsed_var("MAX_BODY_BYTES").unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: parsed_var("REQUEST_TIMEOUT_SECONDS").unwrap_or(30),
        }
    }

    /// Effective gateway deadline.
    ///
    /// Always at most three quarters of the request timeout, leaving the
    /// handler time to record a failed payment before the request is cut off.
    #[must_use]
    pub fn gateway_timeout(&self) -> Duration {
        let configured = Duration::from_secs(self.gateway_timeout_seconds);
        let cap = Duration::from_secs(self.request_timeout_seconds) * 3 / 4;
        configured.min(cap)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

fn random_secret() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("listen_addr", &self.listen_addr)
            .field("database_configured", &self.database_url.is_some())
            .field("database_max_connections", &self.database_max_connections)
            .field("razorpay_key_id", &self.razorpay_key_id)
            .field("razorpay_api_url", &self.razorpay_api_url)
            .field("gateway_timeout_seconds", &self.gateway_timeout_seconds)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish_non_exhaustive()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5001".into(),
            database_url: None,
            database_max_connections: 5,
            razorpay_key_id: None,
            razorpay_key_secret: None,
            razorpay_api_url: DEFAULT_BASE_URL.into(),
            gateway_timeout_seconds: 10,
            session_secret: random_secret(),
            session_ttl_seconds: 7 * 24 * 3600,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
