//! Health, metrics and static file tests

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{TestApp, PUBLIC_PREFIX};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let response = app.server.get("/health/live").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = TestApp::new();

    let response = app.server.get("/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"]["database"]["status"], "unhealthy");
    assert_eq!(json["checks"]["storage"]["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new();
    app.server.get("/health").await;

    let response = app.server.get("/metrics").await;

    response.assert_status_ok();
    let content_type = response.header(header::CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    assert!(response.text().contains("carwash_http_requests_total"));
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
    assert!(response.maybe_header(header::STRICT_TRANSPORT_SECURITY).is_none());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    app.server
        .get("/api/v1/nothing-here")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uploaded_photos_are_served() {
    let app = TestApp::new();
    let dir = app.uploads.path().join("deliveries");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("after_1_1700000000.jpg"), [0xFF, 0xD8, 0xFF]).unwrap();

    let response = app
        .server
        .get(&format!("/{}/deliveries/after_1_1700000000.jpg", PUBLIC_PREFIX))
        .await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().to_vec(), vec![0xFF, 0xD8, 0xFF]);
}
