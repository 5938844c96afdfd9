//! Payment verification endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::services::payments::{self, VerifyPaymentRequest, VerifyPaymentResponse};
use crate::session::Session;
use crate::state::AppState;

/// `POST /verify_payment`.
///
/// An unparseable body is treated as a callback with every field missing, so
/// it takes the same failure path as any other malformed callback.
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    session: Session,
    body: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(e) => {
            tracing::warn!(error = %e.body_text(), "Unparseable payment callback");
            VerifyPaymentRequest::default()
        }
    };

    let response = payments::verify_payment(
        state.store.as_ref(),
        state.gateway(),
        session.user_id(),
        &request,
    )
    .await?;

    Ok(Json(response))
}
