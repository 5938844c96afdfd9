//! Order creation endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::services::orders::{self, CreateOrderRequest, CreateOrderResponse};
use crate::state::AppState;

/// `POST /create_order`.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let response =
        orders::create_order(&state.catalog, state.gateway(), body.course_id.as_deref()).await?;

    Ok(Json(response))
}
