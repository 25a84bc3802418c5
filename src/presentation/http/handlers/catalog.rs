//! Catalog and Management Handlers
//!
//! Products, services, fixed costs and the hourly labor rate.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{
    CreateFixedCostRequest, CreateProductRequest, CreateServiceRequest, UpdateHourlyRateRequest,
};
use crate::application::dto::response::{ManagementResponse, ProductResponse};
use crate::application::services::{CatalogService, CatalogServiceImpl};
use crate::domain::{FixedCost, ServiceCatalogEntry, ShopSettings};
use crate::infrastructure::repositories::{
    PgFixedCostRepository, PgProductRepository, PgServiceCatalogRepository, PgSettingsRepository,
};
use crate::presentation::http::extractors::parse_id;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

type Catalog = CatalogServiceImpl<
    PgProductRepository,
    PgServiceCatalogRepository,
    PgFixedCostRepository,
    PgSettingsRepository,
>;

fn catalog_service(state: &AppState) -> Catalog {
    CatalogServiceImpl::new(
        Arc::new(PgProductRepository::new(state.db.clone())),
        Arc::new(PgServiceCatalogRepository::new(state.db.clone())),
        Arc::new(PgFixedCostRepository::new(state.db.clone())),
        Arc::new(PgSettingsRepository::new(state.db.clone())),
    )
}

/// Everything on the management page
pub async fn management(State(state): State<AppState>) -> Result<Json<ManagementResponse>, AppError> {
    let overview = catalog_service(&state).overview().await?;
    Ok(Json(overview.into()))
}

// Products

pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    validate(&body)?;

    let product = catalog_service(&state).create_product(body.into()).await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = catalog_service(&state).list_products().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let product_id = parse_id(&product_id, "product")?;
    catalog_service(&state).delete_product(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Services

pub async fn create_service(
    State(state): State<AppState>,
    Json(body): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceCatalogEntry>), AppError> {
    validate(&body)?;

    let service = catalog_service(&state).create_service(body.into()).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceCatalogEntry>>, AppError> {
    Ok(Json(catalog_service(&state).list_services().await?))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let service_id = parse_id(&service_id, "service")?;
    catalog_service(&state).delete_service(service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Fixed costs

pub async fn create_fixed_cost(
    State(state): State<AppState>,
    Json(body): Json<CreateFixedCostRequest>,
) -> Result<(StatusCode, Json<FixedCost>), AppError> {
    validate(&body)?;

    let cost = catalog_service(&state).create_fixed_cost(body.into()).await?;

    Ok((StatusCode::CREATED, Json(cost)))
}

pub async fn list_fixed_costs(State(state): State<AppState>) -> Result<Json<Vec<FixedCost>>, AppError> {
    Ok(Json(catalog_service(&state).list_fixed_costs().await?))
}

pub async fn delete_fixed_cost(
    State(state): State<AppState>,
    Path(fixed_cost_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let fixed_cost_id = parse_id(&fixed_cost_id, "fixed cost")?;
    catalog_service(&state).delete_fixed_cost(fixed_cost_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Settings

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<ShopSettings>, AppError> {
    Ok(Json(catalog_service(&state).get_settings().await?))
}

/// Update the hourly labor rate
pub async fn update_hourly_rate(
    State(state): State<AppState>,
    Json(body): Json<UpdateHourlyRateRequest>,
) -> Result<Json<ShopSettings>, AppError> {
    let settings = catalog_service(&state).set_hourly_rate(body.hourly_rate).await?;
    Ok(Json(settings))
}
