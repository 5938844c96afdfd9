//! Health endpoint tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn health_reports_ok() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "coursepay");
    assert_eq!(body["gateway_configured"], true);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn health_reports_missing_gateway() {
    let harness = TestHarness::without_gateway();

    let body: serde_json::Value = harness.server.get("/health").await.json();
    assert_eq!(body["gateway_configured"], false);
}
