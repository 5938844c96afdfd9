//! Checkout flow integration tests: create an order, then verify it.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{test_config, TestHarness};
use coursepay_core::{PaymentStatus, UserId};
use coursepay_service::{InMemoryGateway, ServiceConfig};
use coursepay_store::Store;
use serde_json::json;

async fn place_order(harness: &TestHarness, course_id: &str) -> String {
    let body: serde_json::Value = harness
        .server
        .post("/create_order")
        .json(&json!({ "course_id": course_id }))
        .await
        .json();
    body["order_id"].as_str().unwrap().to_string()
}

async fn user_id(harness: &TestHarness, email: &str) -> UserId {
    harness
        .store
        .find_user_by_email(email)
        .await
        .unwrap()
        .unwrap()
        .id
}

#[tokio::test]
async fn verified_payment_shows_on_dashboard() {
    let harness = TestHarness::new();
    let cookie = harness
        .register_and_login("asha", "asha@example.com")
        .await;

    let order_id = place_order(&harness, "gen-ai").await;
    let signature = harness.gateway().sign(&order_id, "pay_001");

    let response = harness
        .server
        .post("/verify_payment")
        .add_header("cookie", cookie.clone())
        .json(&json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_001",
            "razorpay_signature": signature,
            "course_id": "gen-ai",
        }))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "status": "success",
        "message": "Payment verified successfully!",
    }));

    let user = user_id(&harness, "asha@example.com").await;
    let rows = harness.store.list_payments_by_user(&user).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, PaymentStatus::Success);
    assert_eq!(rows[0].amount, 149_900);

    let dashboard = harness
        .server
        .get("/dashboard")
        .add_header("cookie", cookie)
        .await;
    dashboard.assert_status_ok();
    let html = dashboard.text();
    assert!(html.contains("Generative AI Mastery"));
    assert!(html.contains("1499.00"));
    assert!(html.contains(&order_id));
}

#[tokio::test]
async fn anonymous_purchase_is_recorded_without_user() {
    let harness = TestHarness::new();
    let order_id = place_order(&harness, "python").await;
    let signature = harness.gateway().sign(&order_id, "pay_anon");

    harness
        .server
        .post("/verify_payment")
        .json(&json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_anon",
            "razorpay_signature": signature,
        }))
        .await
        .assert_status_ok();

    assert_eq!(harness.store.count_payments().await.unwrap(), 1);
}

#[tokio::test]
async fn forged_signature_is_rejected() {
    let harness = TestHarness::new();
    let order_id = place_order(&harness, "ml").await;

    let response = harness
        .server
        .post("/verify_payment")
        .json(&json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_002",
            "razorpay_signature": "00".repeat(32),
            "course_id": "ml",
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "status": "error",
        "message": "Payment verification failed.",
    }));

    assert_eq!(harness.store.count_payments().await.unwrap(), 0);
}

#[tokio::test]
async fn incomplete_callback_records_failed_attempt() {
    let harness = TestHarness::new();
    let cookie = harness
        .register_and_login("ravi", "ravi@example.com")
        .await;

    let response = harness
        .server
        .post("/verify_payment")
        .add_header("cookie", cookie)
        .json(&json!({
            "razorpay_order_id": "order_lost",
            "razorpay_payment_id": "pay_lost",
            "course_id": "master",
        }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "status": "error",
        "message": "An internal error occurred.",
    }));

    let user = user_id(&harness, "ravi@example.com").await;
    let rows = harness.store.list_payments_by_user(&user).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, PaymentStatus::Failed);
    assert_eq!(rows[0].course_id, "master");
    assert_eq!(rows[0].amount, 0);
}

#[tokio::test]
async fn malformed_body_takes_failure_path() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/verify_payment")
        .text("{not json")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(harness.store.count_payments().await.unwrap(), 0);
}

#[tokio::test]
async fn empty_or_null_signature_is_rejected_without_a_row() {
    let harness = TestHarness::new();

    for signature in [json!(""), json!(null)] {
        let response = harness
            .server
            .post("/verify_payment")
            .json(&json!({
                "razorpay_order_id": "order_victim",
                "razorpay_payment_id": "pay_x",
                "razorpay_signature": signature,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "status": "error",
            "message": "Payment verification failed.",
        }));
    }

    assert_eq!(harness.store.count_payments().await.unwrap(), 0);
}

#[tokio::test]
async fn hung_gateway_still_records_failed_attempt() {
    let harness = TestHarness::with_config(
        Some(InMemoryGateway::new().slow_fetches(Duration::from_secs(2))),
        ServiceConfig {
            request_timeout_seconds: 1,
            ..test_config()
        },
    );
    let order_id = place_order(&harness, "ml").await;
    let signature = harness.gateway().sign(&order_id, "pay_slow");

    let response = harness
        .server
        .post("/verify_payment")
        .json(&json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_slow",
            "razorpay_signature": signature,
            "course_id": "ml",
        }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "status": "error",
        "message": "An internal error occurred.",
    }));

    assert_eq!(harness.store.count_payments().await.unwrap(), 1);
}
