//! Order creation.

use serde::{Deserialize, Serialize};

use coursepay_core::{Catalog, CURRENCY, ORDER_DESCRIPTION};

use crate::error::ApiError;
use crate::gateway::{OrderNotes, OrderRequest, PaymentGateway};

/// Body of `POST /create_order`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    /// Catalog key of the course to buy.
    #[serde(default)]
    pub course_id: Option<String>,
}

/// Everything the checkout widget needs to take payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// Gateway order ID.
    pub order_id: String,
    /// Amount in minor units, as the gateway recorded it.
    pub amount: i64,
    /// Currency, as the gateway recorded it.
    pub currency: String,
    /// Public gateway key for the widget.
    pub key_id: String,
    /// Course display name.
    pub course_name: String,
    /// Fixed product description.
    pub description: String,
}

/// Merchant receipt reference: `receipt_{course_id}_{8 random hex chars}`.
#[must_use]
pub fn receipt_for(course_id: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("receipt_{course_id}_{}", &suffix[..8])
}

/// Create a gateway order for a catalog course.
///
/// The course is validated before the gateway is contacted. Gateway failures
/// are terminal; nothing is retried.
pub async fn create_order(
    catalog: &Catalog,
    gateway: Option<&dyn PaymentGateway>,
    course_id: Option<&str>,
) -> Result<CreateOrderResponse, ApiError> {
    let course = course_id
        .filter(|id| !id.is_empty())
        .and_then(|id| catalog.get(id))
        .ok_or(ApiError::InvalidCourse)?;

    let gateway =
        gateway.ok_or_else(|| ApiError::Gateway("payment gateway not configured".into()))?;

    let request = OrderRequest {
        amount: course.amount_minor(),
        currency: CURRENCY.to_string(),
        receipt: receipt_for(&course.id),
        notes: OrderNotes {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
        },
    };

    let order = gateway
        .create_order(&request)
        .await
        .map_err(|e| ApiError::Gateway(e.to_string()))?;

    tracing::info!(
        order_id = %order.id,
        course_id = %course.id,
        amount = %order.amount,
        "Order created"
    );

    Ok(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: gateway.key_id().to_string(),
        course_name: course.name.clone(),
        description: ORDER_DESCRIPTION.to_string(),
    })
}
