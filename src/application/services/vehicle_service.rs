//! Vehicle Service
//!
//! Registers vehicles for existing customers and lists them with their owner.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::{
    CustomerRepository, Vehicle, VehicleCategory, VehicleRepository, VehicleWithOwner,
};
use crate::shared::error::AppError;

/// Vehicle service trait
#[async_trait]
pub trait VehicleService: Send + Sync {
    async fn create_vehicle(&self, dto: CreateVehicleDto) -> Result<Vehicle, VehicleError>;

    async fn list_vehicles(&self) -> Result<Vec<VehicleWithOwner>, VehicleError>;

    /// Delete a vehicle and its wash jobs
    async fn delete_vehicle(&self, vehicle_id: i64) -> Result<(), VehicleError>;
}

/// Create vehicle input
#[derive(Debug, Clone)]
pub struct CreateVehicleDto {
    pub customer_id: i64,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub category: Option<String>,
}

/// Vehicle service errors
#[derive(Debug, thiserror::Error)]
pub enum VehicleError {
    #[error("Vehicle with id {0} not found")]
    NotFound(i64),

    #[error("Customer with id {0} not found")]
    CustomerNotFound(i64),

    #[error("Plate is required")]
    MissingPlate,

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<VehicleError> for AppError {
    fn from(err: VehicleError) -> Self {
        let message = err.to_string();
        match err {
            VehicleError::NotFound(_) | VehicleError::CustomerNotFound(_) => {
                AppError::NotFound(message)
            }
            VehicleError::MissingPlate => AppError::BadRequest(message),
            VehicleError::Repository(e) => e,
        }
    }
}

/// VehicleService implementation
pub struct VehicleServiceImpl<V, C>
where
    V: VehicleRepository,
    C: CustomerRepository,
{
    vehicle_repo: Arc<V>,
    customer_repo: Arc<C>,
}

impl<V, C> VehicleServiceImpl<V, C>
where
    V: VehicleRepository,
    C: CustomerRepository,
{
    pub fn new(vehicle_repo: Arc<V>, customer_repo: Arc<C>) -> Self {
        Self {
            vehicle_repo,
            customer_repo,
        }
    }
}

#[async_trait]
impl<V, C> VehicleService for VehicleServiceImpl<V, C>
where
    V: VehicleRepository + 'static,
    C: CustomerRepository + 'static,
{
    async fn create_vehicle(&self, dto: CreateVehicleDto) -> Result<Vehicle, VehicleError> {
        let customer = self
            .customer_repo
            .find_by_id(dto.customer_id)
            .await?
            .ok_or(VehicleError::CustomerNotFound(dto.customer_id))?;

        let category = VehicleCategory::parse(dto.category.as_deref().unwrap_or_default());
        let vehicle = Vehicle::new(customer.id, dto.brand, dto.model, &dto.plate, category);
        if vehicle.plate.is_empty() {
            return Err(VehicleError::MissingPlate);
        }

        let vehicle = self.vehicle_repo.create(&vehicle).await?;
        info!(customer_id = customer.id, vehicle_id = vehicle.id, plate = %vehicle.plate, "Vehicle registered");
        Ok(vehicle)
    }

    async fn list_vehicles(&self) -> Result<Vec<VehicleWithOwner>, VehicleError> {
        Ok(self.vehicle_repo.find_all_with_owner().await?)
    }

    async fn delete_vehicle(&self, vehicle_id: i64) -> Result<(), VehicleError> {
        self.vehicle_repo
            .delete(vehicle_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => VehicleError::NotFound(vehicle_id),
                e => VehicleError::Repository(e),
            })?;

        info!(vehicle_id, "Vehicle deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, MockCustomerRepository, MockVehicleRepository};
    use mockall::predicate::eq;

    fn dto(customer_id: i64, plate: &str) -> CreateVehicleDto {
        CreateVehicleDto {
            customer_id,
            brand: "Toyota".into(),
            model: "Hilux".into(),
            plate: plate.into(),
            category: Some("pickup".into()),
        }
    }

    #[tokio::test]
    async fn test_create_vehicle_for_missing_customer() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_id().with(eq(7)).returning(|_| Ok(None));
        let mut vehicles = MockVehicleRepository::new();
        vehicles.expect_create().never();

        let svc = VehicleServiceImpl::new(Arc::new(vehicles), Arc::new(customers));
        let err: AppError = svc.create_vehicle(dto(7, "ABC1234")).await.unwrap_err().into();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_vehicle_normalizes_plate_and_category() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_id().returning(|id| {
            Ok(Some(Customer {
                id,
                ..Customer::new("Ana", "1199", None)
            }))
        });
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_create()
            .withf(|v| v.plate == "QWE4R56" && v.category == VehicleCategory::Pickup)
            .returning(|v| Ok(Vehicle { id: 3, ..v.clone() }));

        let svc = VehicleServiceImpl::new(Arc::new(vehicles), Arc::new(customers));
        let vehicle = svc.create_vehicle(dto(2, "qwe4r56")).await.unwrap();

        assert_eq!(vehicle.id, 3);
        assert_eq!(vehicle.customer_id, 2);
    }

    #[tokio::test]
    async fn test_create_vehicle_requires_plate() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_id().returning(|id| {
            Ok(Some(Customer {
                id,
                ..Customer::new("Ana", "1199", None)
            }))
        });

        let svc = VehicleServiceImpl::new(Arc::new(MockVehicleRepository::new()), Arc::new(customers));
        let result = svc.create_vehicle(dto(2, "  ")).await;

        assert!(matches!(result, Err(VehicleError::MissingPlate)));
    }

    #[tokio::test]
    async fn test_delete_missing_vehicle() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_delete()
            .returning(|id| Err(AppError::NotFound(format!("Vehicle with id {} not found", id))));

        let svc = VehicleServiceImpl::new(Arc::new(vehicles), Arc::new(MockCustomerRepository::new()));
        let result = svc.delete_vehicle(12).await;

        assert!(matches!(result, Err(VehicleError::NotFound(12))));
    }
}
