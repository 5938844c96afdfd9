//! Razorpay API types.

use serde::{Deserialize, Serialize};

/// Notes attached to an order at creation time.
///
/// The gateway echoes them back on fetch, which is how verification recovers
/// the course without trusting the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNotes {
    /// Catalog key of the course being bought.
    pub course_id: String,
    /// Display name of the course.
    pub course_name: String,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Merchant receipt reference.
    pub receipt: String,
    /// Free-form notes.
    pub notes: OrderNotes,
}

/// Razorpay order object.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Order ID (`order_...`).
    pub id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// Currency (e.g. "INR").
    pub currency: String,
    /// Receipt reference.
    #[serde(default)]
    pub receipt: Option<String>,
    /// Order status (created, attempted, paid).
    #[serde(default)]
    pub status: Option<String>,
    /// Notes. An object when set, an empty array when not.
    #[serde(default)]
    pub notes: serde_json::Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created_at: i64,
}

impl Order {
    /// The `course_id` note, if the order carries one.
    #[must_use]
    pub fn course_id(&self) -> Option<&str> {
        self.notes.get("course_id").and_then(serde_json::Value::as_str)
    }
}

/// Razorpay error response.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayErrorResponse {
    /// Error details.
    pub error: RazorpayErrorDetail,
}

/// Razorpay error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayErrorDetail {
    /// Error code (e.g. `BAD_REQUEST_ERROR`).
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}
