//! Razorpay API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{Order, OrderRequest, RazorpayErrorResponse};
use super::{GatewayError, PaymentGateway};
use crate::crypto::{constant_time_eq, payment_signature};

/// Default Razorpay API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.razorpay.com/v1";

/// Per-request timeout unless [`RazorpayClient::with_timeout`] sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Razorpay API client.
#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    timeout: Duration,
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    ///
    /// # Arguments
    ///
    /// * `key_id` - Public key id (`rzp_test_...` or `rzp_live_...`)
    /// * `key_secret` - Secret paired with the key id; also signs payments
    /// * `base_url` - API root, normally [`DEFAULT_BASE_URL`]
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are empty or the HTTP client cannot be built.
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let key_id = key_id.into();
        let key_secret = key_secret.into();
        if key_id.is_empty() || key_secret.is_empty() {
            return Err(GatewayError::Configuration(
                "Razorpay key id and secret must be non-empty".into(),
            ));
        }

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id,
            key_secret,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Bound every API call by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        match response.json::<RazorpayErrorResponse>().await {
            Ok(body) => Err(GatewayError::Api {
                code: body.error.code,
                description: body.error.description,
            }),
            Err(_) => Err(GatewayError::Api {
                code: "unknown".to_string(),
                description: format!("HTTP {status}"),
            }),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order, GatewayError> {
        tracing::debug!(
            amount = %request.amount,
            receipt = %request.receipt,
            course_id = %request.notes.course_id,
            "Creating Razorpay order"
        );

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn fetch_order(&self, order_id: &str) -> Result<Order, GatewayError> {
        let response = self
            .client
            .get(format!("{}/orders/{}", self.base_url, order_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .timeout(self.timeout)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError> {
        let expected = payment_signature(&self.key_secret, order_id, payment_id);

        if constant_time_eq(&expected, signature) {
            Ok(())
        } else {
            Err(GatewayError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OrderNotes;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> RazorpayClient {
        RazorpayClient::new("rzp_test_key", "test_secret", base_url).unwrap()
    }

    fn order_request() -> OrderRequest {
        OrderRequest {
            amount: 49_900,
            currency: "INR".into(),
            receipt: "receipt_python_0a1b2c3d".into(),
            notes: OrderNotes {
                course_id: "python".into(),
                course_name: "Python for AI & ML".into(),
            },
        }
    }

    #[test]
    fn rejects_empty_credentials() {
        assert!(matches!(
            RazorpayClient::new("", "secret", DEFAULT_BASE_URL),
            Err(GatewayError::Configuration(_))
        ));
        assert!(matches!(
            RazorpayClient::new("key", "", DEFAULT_BASE_URL),
            Err(GatewayError::Configuration(_))
        ));
    }

    #[test]
    fn debug_hides_secret() {
        let debug = format!("{:?}", client(DEFAULT_BASE_URL));
        assert!(debug.contains("rzp_test_key"));
        assert!(!debug.contains("test_secret"));
    }

    #[test]
    fn signature_verification() {
        let client = client(DEFAULT_BASE_URL);
        let good = payment_signature("test_secret", "order_1", "pay_1");

        assert!(client
            .verify_payment_signature("order_1", "pay_1", &good)
            .is_ok());
        assert!(matches!(
            client.verify_payment_signature("order_1", "pay_2", &good),
            Err(GatewayError::InvalidSignature)
        ));
        assert!(matches!(
            client.verify_payment_signature("order_1", "pay_1", "deadbeef"),
            Err(GatewayError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn create_order_posts_json_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(basic_auth("rzp_test_key", "test_secret"))
            .and(body_partial_json(json!({
                "amount": 49900,
                "currency": "INR",
                "notes": { "course_id": "python" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_123",
                "entity": "order",
                "amount": 49900,
                "currency": "INR",
                "receipt": "receipt_python_0a1b2c3d",
                "status": "created",
                "notes": { "course_id": "python", "course_name": "Python for AI & ML" },
                "created_at": 1_700_000_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let order = client(&server.uri())
            .create_order(&order_request())
            .await
            .unwrap();

        assert_eq!(order.id, "order_123");
        assert_eq!(order.amount, 49_900);
        assert_eq!(order.course_id(), Some("python"));
    }

    #[tokio::test]
    async fn api_errors_are_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "Authentication failed"
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .create_order(&order_request())
            .await
            .unwrap_err();

        match err {
            GatewayError::Api { code, description } => {
                assert_eq!(code, "BAD_REQUEST_ERROR");
                assert_eq!(description, "Authentication failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_errors_report_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/order_missing"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client(&format!("{}/", server.uri()))
            .fetch_order("order_missing")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Api { ref code, ref description }
                if code == "unknown" && description.contains("502")
        ));
    }

    #[tokio::test]
    async fn fetch_order_reads_notes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/order_123"))
            .and(basic_auth("rzp_test_key", "test_secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_123",
                "amount": 79900,
                "currency": "INR",
                "status": "paid",
                "notes": { "course_id": "ml", "course_name": "Machine Learning in Depth" }
            })))
            .mount(&server)
            .await;

        let order = client(&server.uri()).fetch_order("order_123").await.unwrap();
        assert_eq!(order.course_id(), Some("ml"));
        assert_eq!(order.amount, 79_900);
    }

    #[tokio::test]
    async fn slow_responses_hit_the_configured_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/order_slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(json!({ "id": "order_slow", "amount": 1, "currency": "INR" })),
            )
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .with_timeout(Duration::from_millis(200))
            .fetch_order("order_slow")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Http(e) if e.is_timeout()));
    }
}
