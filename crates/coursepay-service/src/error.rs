//! API error types and responses.
//!
//! The two payment endpoints have fixed response shapes that the checkout
//! script depends on: order creation errors are `{"error": ...}` and
//! verification errors are `{"status": "error", "message": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested course is not in the catalog.
    #[error("invalid course id")]
    InvalidCourse,

    /// The gateway refused or failed to create an order.
    #[error("gateway error: {0}")]
    Gateway(String),

    /// The payment signature did not match. Nothing is persisted.
    #[error("payment signature verification failed")]
    SignatureVerification,

    /// Verification failed after the signature check. An audit row was attempted.
    #[error("payment verification error: {0}")]
    Verification(String),

    /// Bad request - unparseable input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidCourse => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid course ID" }),
            ),
            Self::Gateway(msg) => {
                tracing::error!(error = %msg, "Error creating order");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Could not create order" }),
                )
            }
            Self::SignatureVerification => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "error", "message": "Payment verification failed." }),
            ),
            Self::Verification(msg) => {
                tracing::error!(error = %msg, "Payment verification error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "message": "An internal error occurred." }),
                )
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<coursepay_store::StoreError> for ApiError {
    fn from(err: coursepay_store::StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        Self::Internal(format!("template rendering failed: {err}"))
    }
}

impl From<crate::session::SessionError> for ApiError {
    fn from(err: crate::session::SessionError) -> Self {
        Self::Internal(err.to_string())
    }
}
