//! Common test utilities for coursepay integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::Router;
use axum_test::{TestResponse, TestServer};
use serde_json::json;

use coursepay_service::{create_router, AppState, InMemoryGateway, ServiceConfig};
use coursepay_store::{MemoryStore, Store};

/// Minimum bcrypt cost, keeps registration fast.
pub const TEST_PASSWORD_COST: u32 = 4;

/// Password used by [`TestHarness::register_and_login`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for inspecting persisted rows.
    pub store: Arc<MemoryStore>,
    /// The gateway behind the server, if one is configured.
    pub gateway: Option<Arc<InMemoryGateway>>,
}

impl TestHarness {
    /// Create a new test harness with an in-memory gateway.
    pub fn new() -> Self {
        Self::with_gateway(Some(InMemoryGateway::new()))
    }

    /// Create a harness with no payment gateway configured.
    pub fn without_gateway() -> Self {
        Self::with_gateway(None)
    }

    /// Create a harness around a specific gateway.
    pub fn with_gateway(gateway: Option<InMemoryGateway>) -> Self {
        Self::with_config(gateway, test_config())
    }

    /// Create a harness with a specific gateway and configuration.
    pub fn with_config(gateway: Option<InMemoryGateway>, config: ServiceConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let gateway = gateway.map(Arc::new);

        let mut state = AppState::new(store.clone() as Arc<dyn Store>, config)
            .with_password_cost(TEST_PASSWORD_COST);
        if let Some(gateway) = &gateway {
            state = state.with_gateway(gateway.clone());
        }
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            gateway,
        }
    }

    /// The configured gateway. Panics if the harness has none.
    pub fn gateway(&self) -> &InMemoryGateway {
        self.gateway.as_deref().expect("harness has no gateway")
    }

    /// Register a user, log in, and return the session cookie.
    pub async fn register_and_login(&self, username: &str, email: &str) -> String {
        self.server
            .post("/register")
            .form(&json!({
                "username": username,
                "email": email,
                "password": TEST_PASSWORD,
            }))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = self
            .server
            .post("/login")
            .form(&json!({ "email": email, "password": TEST_PASSWORD }))
            .await;
        assert_eq!(location(&response), "/dashboard");

        session_cookie(&response)
    }
}

/// Configuration shared by every harness. The fixed session secret lets a
/// cookie issued by one harness be read by another.
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        session_secret: "integration-test-secret".into(),
        ..ServiceConfig::default()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The `name=value` pair from the response's session cookie.
pub fn session_cookie(response: &TestResponse) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response sets no cookie")
        .to_str()
        .expect("cookie is not ASCII");
    header
        .split(';')
        .next()
        .expect("empty Set-Cookie header")
        .to_string()
}

/// The redirect target of a response.
pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(LOCATION)
        .expect("response is not a redirect")
        .to_str()
        .expect("location is not ASCII")
        .to_string()
}
