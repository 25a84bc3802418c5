//! Customer Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::application::dto::request::{CreateCustomerRequest, RegisterCustomerVehicleRequest};
use crate::application::dto::response::{
    CascadeDeleteResponse, CustomerProfileResponse, CustomerVisitResponse, WashJobResponse,
};
use crate::application::services::{CustomerService, CustomerServiceImpl};
use crate::domain::{Customer, Vehicle};
use crate::infrastructure::repositories::{
    PgCustomerRepository, PgVehicleRepository, PgWashJobRepository,
};
use crate::presentation::http::extractors::parse_id;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

type Customers = CustomerServiceImpl<PgCustomerRepository, PgVehicleRepository, PgWashJobRepository>;

fn customer_service(state: &AppState) -> Customers {
    CustomerServiceImpl::new(
        Arc::new(PgCustomerRepository::new(state.db.clone())),
        Arc::new(PgVehicleRepository::new(state.db.clone())),
        Arc::new(PgWashJobRepository::new(state.db.clone())),
    )
}

/// Customer and vehicle created together
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub customer: Customer,
    pub vehicle: Vehicle,
}

/// Find or create a customer by phone
pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    validate(&body)?;

    let customer = customer_service(&state).create_customer(body.into()).await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// List customers with their last visit
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerVisitResponse>>, AppError> {
    let now = Utc::now();
    let customers = customer_service(&state).list_customers().await?;

    Ok(Json(
        customers
            .into_iter()
            .map(|visit| CustomerVisitResponse::from_visit(visit, now))
            .collect(),
    ))
}

/// Register a customer together with a vehicle
pub async fn register_customer_vehicle(
    State(state): State<AppState>,
    Json(body): Json<RegisterCustomerVehicleRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    validate(&body)?;

    let (customer, vehicle) = customer_service(&state)
        .register_with_vehicle(body.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RegistrationResponse { customer, vehicle })))
}

/// The ten newest customers
pub async fn recent_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(customer_service(&state).recent_customers().await?))
}

/// Customer profile with vehicles, jobs and total paid
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerProfileResponse>, AppError> {
    let customer_id = parse_id(&customer_id, "customer")?;

    let profile = customer_service(&state).get_profile(customer_id).await?;

    Ok(Json(profile.into()))
}

/// Completed jobs, newest first
pub async fn get_customer_history(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<WashJobResponse>>, AppError> {
    let customer_id = parse_id(&customer_id, "customer")?;

    let jobs = customer_service(&state).get_history(customer_id).await?;

    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

/// Delete a customer with their vehicles and jobs
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CascadeDeleteResponse>, AppError> {
    let customer_id = parse_id(&customer_id, "customer")?;

    let summary = customer_service(&state).delete_customer(customer_id).await?;

    Ok(Json(summary.into()))
}
