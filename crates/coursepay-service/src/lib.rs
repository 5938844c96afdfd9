//! Course checkout HTTP service.
//!
//! This crate serves the course storefront and its payment flow:
//!
//! - Course catalog and landing page
//! - Gateway order creation and payment verification
//! - Registration, login and logout
//! - Per-user payment dashboard
//!
//! # Sessions
//!
//! Sessions are signed tokens held in a single cookie (see [`session`]). The
//! logged-in user, if any, is attached to verified payments.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for the router

pub mod config;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod templates;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use gateway::{InMemoryGateway, PaymentGateway, RazorpayClient};
pub use routes::create_router;
pub use session::Session;
pub use state::AppState;
