//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, health, orders, pages, payments};
use crate::state::AppState;

/// Maximum concurrent requests for the checkout endpoints.
/// Each one holds an outbound gateway call open.
const PAYMENT_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Pages
/// - `GET /` - Course catalog
/// - `GET /dashboard` - Payment history (login required)
///
/// ## Accounts
/// - `GET|POST /register` - Registration form
/// - `GET|POST /login` - Login form
/// - `GET /logout` - End the session
///
/// ## Checkout (concurrency-limited)
/// - `POST /create_order` - Create a gateway order for a course
/// - `POST /verify_payment` - Verify and record a completed payment
///
/// ## Public
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let checkout_routes = Router::new()
        .route("/create_order", post(orders::create_order))
        .route("/verify_payment", post(payments::verify_payment))
        .layer(ConcurrencyLimitLayer::new(PAYMENT_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/", get(pages::index))
        .route("/dashboard", get(pages::dashboard))
        .route(
            "/register",
            get(accounts::register_page).post(accounts::register),
        )
        .route("/login", get(accounts::login_page).post(accounts::login))
        .route("/logout", get(accounts::logout))
        .route("/health", get(health::health))
        .merge(checkout_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}
