//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{create_security_headers_layer, track_metrics};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.settings.storage.upload_dir);
    let public_prefix = format!(
        "/{}",
        state.settings.storage.public_prefix.trim_matches('/')
    );
    let body_limit = state.settings.storage.max_upload_bytes;
    let security_headers = create_security_headers_layer(&state.settings.environment);

    Router::new()
        .nest("/api/v1", api_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Uploaded photos
        .nest_service(&public_prefix, uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .route_layer(middleware::from_fn(track_metrics))
        // Outermost, so headers are added to all responses
        .layer(security_headers)
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", customer_routes())
        .nest("/vehicles", vehicle_routes())
        .nest("/wash-jobs", wash_job_routes())
        .merge(catalog_routes())
        .route("/dashboard", get(handlers::wash_job::dashboard))
        .route("/reports/financial", get(handlers::report::financial_report))
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::customer::create_customer).get(handlers::customer::list_customers),
        )
        .route("/registrations", post(handlers::customer::register_customer_vehicle))
        .route("/recent", get(handlers::customer::recent_customers))
        .route(
            "/{customer_id}",
            get(handlers::customer::get_customer).delete(handlers::customer::delete_customer),
        )
        .route("/{customer_id}/history", get(handlers::customer::get_customer_history))
}

fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::vehicle::create_vehicle).get(handlers::vehicle::list_vehicles),
        )
        .route("/{vehicle_id}", delete(handlers::vehicle::delete_vehicle))
}

fn wash_job_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::wash_job::register_wash_job).get(handlers::wash_job::list_wash_jobs),
        )
        .route(
            "/{job_id}",
            get(handlers::wash_job::get_wash_job).delete(handlers::wash_job::delete_wash_job),
        )
        .route("/{job_id}/checklist", post(handlers::wash_job::save_checklist))
        .route("/{job_id}/quote", get(handlers::wash_job::quote))
        .route("/{job_id}/complete", post(handlers::wash_job::complete_wash_job))
        .route("/{job_id}/receipt", get(handlers::wash_job::receipt))
}

/// Products, services, fixed costs and settings
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/management", get(handlers::catalog::management))
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route("/products/{product_id}", delete(handlers::catalog::delete_product))
        .route(
            "/services",
            post(handlers::catalog::create_service).get(handlers::catalog::list_services),
        )
        .route("/services/{service_id}", delete(handlers::catalog::delete_service))
        .route(
            "/fixed-costs",
            post(handlers::catalog::create_fixed_cost).get(handlers::catalog::list_fixed_costs),
        )
        .route("/fixed-costs/{fixed_cost_id}", delete(handlers::catalog::delete_fixed_cost))
        .route("/settings", get(handlers::catalog::get_settings))
        .route("/settings/hourly-rate", put(handlers::catalog::update_hourly_rate))
}
