//! Payment verification.
//!
//! The browser posts the gateway's callback fields after checkout. They are
//! attacker-controlled, so the signature is checked first and the amount and
//! course are then re-read from the gateway's copy of the order.
//!
//! Every attempt that gets past the signature check leaves a row: `success`
//! when everything worked, otherwise a best-effort `failed` row built from the
//! request. Signature failures leave nothing.
//!
//! A callback field is either absent or present. Present values, including
//! `""` and `null`, are always run through the signature check. Only absent
//! fields skip it and take the failure path.

use serde::{Deserialize, Deserializer, Serialize};

use coursepay_core::{Payment, UserId};
use coursepay_store::Store;

use crate::error::ApiError;
use crate::gateway::{GatewayError, PaymentGateway};

/// Body of `POST /verify_payment`.
///
/// Fields are optional so that incomplete callbacks take the audited failure
/// path instead of being rejected by the extractor. `None` means the key was
/// absent; an explicit `null` reads as an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyPaymentRequest {
    /// Gateway order id.
    #[serde(default, deserialize_with = "present")]
    pub razorpay_order_id: Option<String>,
    /// Gateway payment id.
    #[serde(default, deserialize_with = "present")]
    pub razorpay_payment_id: Option<String>,
    /// Gateway signature over order id and payment id.
    #[serde(default, deserialize_with = "present")]
    pub razorpay_signature: Option<String>,
    /// Course the browser believes it bought. Only used on failure rows.
    #[serde(default)]
    pub course_id: Option<String>,
}

/// Verification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    /// `"success"`.
    pub status: String,
    /// Human-readable message.
    pub message: String,
}

enum Failure {
    Signature,
    Internal(String),
}

impl From<coursepay_store::StoreError> for Failure {
    fn from(err: coursepay_store::StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Only called for keys that are present, so `null` becomes `Some("")`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Some(Option::<String>::deserialize(deserializer)?.unwrap_or_default()))
}

fn required<'a>(value: Option<&'a String>, name: &str) -> Result<&'a str, Failure> {
    value
        .map(String::as_str)
        .ok_or_else(|| Failure::Internal(format!("missing {name}")))
}

/// Verify a checkout callback and record the outcome.
///
/// `user_id` is the session's user, if any; anonymous purchases are allowed.
pub async fn verify_payment(
    store: &dyn Store,
    gateway: Option<&dyn PaymentGateway>,
    user_id: Option<UserId>,
    request: &VerifyPaymentRequest,
) -> Result<VerifyPaymentResponse, ApiError> {
    match record_verified(store, gateway, user_id, request).await {
        Ok(payment) => {
            tracing::info!(
                order_id = %payment.gateway_order_id,
                payment_id = %payment.gateway_payment_id,
                course_id = %payment.course_id,
                amount = %payment.amount,
                "Payment verified and saved"
            );
            Ok(VerifyPaymentResponse {
                status: "success".into(),
                message: "Payment verified successfully!".into(),
            })
        }
        Err(Failure::Signature) => {
            tracing::warn!(
                order_id = ?request.razorpay_order_id,
                payment_id = ?request.razorpay_payment_id,
                "Payment signature verification failed"
            );
            Err(ApiError::SignatureVerification)
        }
        Err(Failure::Internal(msg)) => {
            record_failure(store, user_id, request).await;
            Err(ApiError::Verification(msg))
        }
    }
}

async fn record_verified(
    store: &dyn Store,
    gateway: Option<&dyn PaymentGateway>,
    user_id: Option<UserId>,
    request: &VerifyPaymentRequest,
) -> Result<Payment, Failure> {
    let order_id = required(request.razorpay_order_id.as_ref(), "razorpay_order_id")?;
    let payment_id = required(request.razorpay_payment_id.as_ref(), "razorpay_payment_id")?;
    let signature = required(request.razorpay_signature.as_ref(), "razorpay_signature")?;

    let gateway =
        gateway.ok_or_else(|| Failure::Internal("payment gateway not configured".into()))?;

    match gateway.verify_payment_signature(order_id, payment_id, signature) {
        Ok(()) => {}
        Err(GatewayError::InvalidSignature) => return Err(Failure::Signature),
        Err(e) => return Err(Failure::Internal(e.to_string())),
    }

    let order = gateway
        .fetch_order(order_id)
        .await
        .map_err(|e| Failure::Internal(format!("fetching order {order_id}: {e}")))?;

    let course_id = order
        .course_id()
        .ok_or_else(|| Failure::Internal(format!("order {order_id} has no course_id note")))?;

    let payment = Payment::success(user_id, course_id, order_id, payment_id, order.amount);
    store.insert_payment(&payment).await?;

    Ok(payment)
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Write the audit row for a failed attempt. Errors are logged, not returned.
async fn record_failure(
    store: &dyn Store,
    user_id: Option<UserId>,
    request: &VerifyPaymentRequest,
) {
    let (Some(order_id), Some(payment_id)) = (
        non_empty(request.razorpay_order_id.as_ref()),
        non_empty(request.razorpay_payment_id.as_ref()),
    ) else {
        tracing::error!("Cannot record failed payment without order and payment ids");
        return;
    };

    let payment = Payment::failed(user_id, request.course_id.clone(), order_id, payment_id);
    match store.insert_payment(&payment).await {
        Ok(()) => tracing::info!(
            order_id = %order_id,
            payment_id = %payment_id,
            "Failed payment attempt recorded"
        ),
        Err(e) => tracing::error!(
            order_id = %order_id,
            error = %e,
            "Could not record failed payment attempt"
        ),
    }
}
