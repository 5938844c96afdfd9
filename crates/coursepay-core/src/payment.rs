//! Payment records.
//!
//! A `Payment` is written exactly once per verification attempt and never
//! updated. Successful rows carry the gateway's own view of the order; failed
//! rows carry whatever the browser sent, with a zero amount.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::{PaymentId, UserId};

/// Course id recorded on failure rows when the request did not name one.
pub const UNKNOWN_COURSE: &str = "unknown";

/// Outcome of a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Signature verified and order details recovered from the gateway.
    Success,
    /// Verification raised after the signature check; audit-only row.
    Failed,
}

impl PaymentStatus {
    /// Lowercase storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// A persisted payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Buyer, if they were logged in.
    pub user_id: Option<UserId>,
    /// Catalog key as reported by the gateway (or the request, on failure).
    pub course_id: String,
    /// Gateway order id. Unique.
    pub gateway_order_id: String,
    /// Gateway payment id. Unique.
    pub gateway_payment_id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// Outcome.
    pub status: PaymentStatus,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// A verified payment.
    #[must_use]
    pub fn success(
        user_id: Option<UserId>,
        course_id: impl Into<String>,
        gateway_order_id: impl Into<String>,
        gateway_payment_id: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            id: PaymentId::generate(),
            user_id,
            course_id: course_id.into(),
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: gateway_payment_id.into(),
            amount,
            status: PaymentStatus::Success,
            created_at: Utc::now(),
        }
    }

    /// An audit row for an attempt that failed after signature verification.
    ///
    /// The course id defaults to [`UNKNOWN_COURSE`] and the amount is zero.
    #[must_use]
    pub fn failed(
        user_id: Option<UserId>,
        course_id: Option<String>,
        gateway_order_id: impl Into<String>,
        gateway_payment_id: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentId::generate(),
            user_id,
            course_id: course_id.unwrap_or_else(|| UNKNOWN_COURSE.to_string()),
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: gateway_payment_id.into(),
            amount: 0,
            status: PaymentStatus::Failed,
            created_at: Utc::now(),
        }
    }

    /// Whether this row records a verified payment.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == PaymentStatus::Success
    }

    /// Amount formatted in major units, e.g. `"499.00"`.
    #[must_use]
    pub fn amount_display(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        let magnitude = self.amount.unsigned_abs();
        format!("{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}
