//! Catalog and management API tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

#[tokio::test]
async fn test_product_rejects_negative_volume() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/products")
        .json(&json!({
            "name": "Shampoo automotivo",
            "purchase_price": "50.00",
            "total_volume": -5000,
            "volume_per_use": 100
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "total_volume: Total volume must not be negative"
    );
}

#[tokio::test]
async fn test_service_requires_name() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/services")
        .json(&json!({ "name": "", "price_hatch": 40, "product_ids": [1, 2] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fixed_cost_requires_item() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/fixed-costs")
        .json(&json!({ "item": "", "amount": "1200.00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_product_id_on_delete() {
    let app = TestApp::new();

    let response = app.server.delete("/api/v1/products/shampoo").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Invalid product ID");
}
