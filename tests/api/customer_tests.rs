//! Customer and vehicle API tests

use axum::http::StatusCode;
use fake::faker::name::en::Name;
use fake::Fake;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

#[tokio::test]
async fn test_create_customer_requires_phone() {
    let app = TestApp::new();
    let name: String = Name().fake();

    let response = app
        .server
        .post("/api/v1/customers")
        .json(&json!({ "name": name, "phone": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["code"], 10007);
    assert_eq!(json["message"], "phone: Phone must be 1-32 characters");
}

#[tokio::test]
async fn test_create_customer_rejects_bad_email() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/customers")
        .json(&json!({ "name": "Ana", "phone": "11999990000", "email": "not-an-email" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_requires_plate() {
    let app = TestApp::new();
    let name: String = Name().fake();

    let response = app
        .server
        .post("/api/v1/customers/registrations")
        .json(&json!({
            "name": name,
            "phone": "11988887777",
            "brand": "Fiat",
            "model": "Uno",
            "plate": ""
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "plate: Plate must be 1-16 characters");
}

#[tokio::test]
async fn test_invalid_customer_id() {
    let app = TestApp::new();

    let response = app.server.get("/api/v1/customers/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Invalid customer ID");
}

#[tokio::test]
async fn test_invalid_vehicle_id_on_delete() {
    let app = TestApp::new();

    app.server
        .delete("/api/v1/vehicles/x1")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_database_failure_hides_details() {
    let app = TestApp::new();

    let response = app.server.get("/api/v1/customers").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["code"], 10000);
    assert_eq!(json["message"], "Internal server error");
}
