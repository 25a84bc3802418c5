//! Vehicle Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreateVehicleRequest;
use crate::application::dto::response::VehicleResponse;
use crate::application::services::{VehicleService, VehicleServiceImpl};
use crate::domain::Vehicle;
use crate::infrastructure::repositories::{PgCustomerRepository, PgVehicleRepository};
use crate::presentation::http::extractors::parse_id;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

fn vehicle_service(state: &AppState) -> VehicleServiceImpl<PgVehicleRepository, PgCustomerRepository> {
    VehicleServiceImpl::new(
        Arc::new(PgVehicleRepository::new(state.db.clone())),
        Arc::new(PgCustomerRepository::new(state.db.clone())),
    )
}

/// Register a vehicle for an existing customer
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(body): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    validate(&body)?;

    let vehicle = vehicle_service(&state).create_vehicle(body.into()).await?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// All vehicles with their owner
pub async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let vehicles = vehicle_service(&state).list_vehicles().await?;

    Ok(Json(vehicles.into_iter().map(Into::into).collect()))
}

/// Delete a vehicle and its wash jobs
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let vehicle_id = parse_id(&vehicle_id, "vehicle")?;

    vehicle_service(&state).delete_vehicle(vehicle_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
