//! Wash job API tests

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/wash-jobs")
        .json(&json!({
            "customer_mode": "new",
            "name": "Carlos",
            "phone": "11912345678",
            "email": "carlos-at-mail",
            "plate": "ABC1D23",
            "service_id": 1
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_requires_service_id() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/wash-jobs")
        .json(&json!({ "customer_mode": "existing", "vehicle_id": 1 }))
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_invalid_wash_job_id() {
    let app = TestApp::new();

    for path in [
        "/api/v1/wash-jobs/abc",
        "/api/v1/wash-jobs/abc/quote",
        "/api/v1/wash-jobs/abc/receipt",
    ] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Invalid wash job ID");
    }
}

#[tokio::test]
async fn test_complete_rejects_non_numeric_amount() {
    let app = TestApp::new();
    let form = MultipartForm::new()
        .add_text("charged_amount", "cinquenta")
        .add_text("product_ids", "1");

    let response = app
        .server
        .post("/api/v1/wash-jobs/1/complete")
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "charged_amount must be a number"
    );
}

#[tokio::test]
async fn test_complete_rejects_bad_product_id() {
    let app = TestApp::new();
    let form = MultipartForm::new()
        .add_text("charged_amount", "80")
        .add_text("product_ids", "2")
        .add_text("product_ids", "cera");

    let response = app
        .server
        .post("/api/v1/wash-jobs/3/complete")
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "product_ids must contain numeric IDs");
}

#[tokio::test]
async fn test_checklist_on_invalid_id() {
    let app = TestApp::new();
    let photo = Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
        .file_name("porta.jpg")
        .mime_type("image/jpeg");
    let form = MultipartForm::new()
        .add_text("fuel", "1/2")
        .add_part("photos", photo);

    let response = app
        .server
        .post("/api/v1/wash-jobs/not-a-number/checklist")
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checklist_requires_multipart() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/wash-jobs/1/checklist")
        .json(&json!({ "fuel": "1/2" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
