//! Customer Service
//!
//! Customer registration (deduplicated by phone), listings, profiles and
//! cascading deletes.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{
    CascadeSummary, Customer, CustomerRepository, CustomerVisit, Vehicle, VehicleCategory,
    VehicleRepository, WashJobRepository, WashJobView,
};
use crate::shared::error::AppError;

/// Number of customers shown in the "recent" strip.
pub const RECENT_CUSTOMERS: i64 = 10;

/// Customer service trait
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Return the customer with this phone, creating it if absent
    async fn create_customer(&self, dto: CreateCustomerDto) -> Result<Customer, CustomerError>;

    /// All customers with their last completed visit
    async fn list_customers(&self) -> Result<Vec<CustomerVisit>, CustomerError>;

    /// Find-or-create the customer and register a new vehicle for it
    async fn register_with_vehicle(
        &self,
        dto: RegisterCustomerVehicleDto,
    ) -> Result<(Customer, Vehicle), CustomerError>;

    /// Customer, vehicles, jobs and total paid
    async fn get_profile(&self, customer_id: i64) -> Result<CustomerProfile, CustomerError>;

    /// Completed jobs, newest finish first
    async fn get_history(&self, customer_id: i64) -> Result<Vec<WashJobView>, CustomerError>;

    /// Newest customers
    async fn recent_customers(&self) -> Result<Vec<Customer>, CustomerError>;

    /// Delete the customer with its vehicles and their wash jobs
    async fn delete_customer(&self, customer_id: i64) -> Result<CascadeSummary, CustomerError>;
}

/// Create customer input
#[derive(Debug, Clone)]
pub struct CreateCustomerDto {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Customer plus vehicle registration input
#[derive(Debug, Clone)]
pub struct RegisterCustomerVehicleDto {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub category: Option<String>,
}

/// Everything shown on a customer's page
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub customer: Customer,
    pub vehicles: Vec<Vehicle>,
    pub wash_jobs: Vec<WashJobView>,
    /// Sum charged over completed jobs
    pub total_paid: Decimal,
}

/// Customer service errors
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Customer with id {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(id) => {
                AppError::NotFound(format!("Customer with id {} not found", id))
            }
            CustomerError::Invalid(msg) => AppError::BadRequest(msg),
            CustomerError::Repository(e) => e,
        }
    }
}

/// CustomerService implementation
pub struct CustomerServiceImpl<C, V, J>
where
    C: CustomerRepository,
    V: VehicleRepository,
    J: WashJobRepository,
{
    customer_repo: Arc<C>,
    vehicle_repo: Arc<V>,
    wash_job_repo: Arc<J>,
}

impl<C, V, J> CustomerServiceImpl<C, V, J>
where
    C: CustomerRepository,
    V: VehicleRepository,
    J: WashJobRepository,
{
    pub fn new(customer_repo: Arc<C>, vehicle_repo: Arc<V>, wash_job_repo: Arc<J>) -> Self {
        Self {
            customer_repo,
            vehicle_repo,
            wash_job_repo,
        }
    }

    async fn require_customer(&self, customer_id: i64) -> Result<Customer, CustomerError> {
        self.customer_repo
            .find_by_id(customer_id)
            .await?
            .ok_or(CustomerError::NotFound(customer_id))
    }
}

fn require_phone(phone: &str) -> Result<(), CustomerError> {
    if Customer::normalize_phone(phone).is_empty() {
        return Err(CustomerError::Invalid("Phone number is required".into()));
    }
    Ok(())
}

#[async_trait]
impl<C, V, J> CustomerService for CustomerServiceImpl<C, V, J>
where
    C: CustomerRepository + 'static,
    V: VehicleRepository + 'static,
    J: WashJobRepository + 'static,
{
    async fn create_customer(&self, dto: CreateCustomerDto) -> Result<Customer, CustomerError> {
        require_phone(&dto.phone)?;
        let customer = Customer::new(dto.name, &dto.phone, dto.email);
        Ok(self.customer_repo.find_or_create(&customer).await?)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerVisit>, CustomerError> {
        Ok(self.customer_repo.find_all_with_last_visit().await?)
    }

    async fn register_with_vehicle(
        &self,
        dto: RegisterCustomerVehicleDto,
    ) -> Result<(Customer, Vehicle), CustomerError> {
        require_phone(&dto.phone)?;
        if Vehicle::normalize_plate(&dto.plate).is_empty() {
            return Err(CustomerError::Invalid("Plate is required".into()));
        }

        let customer = self
            .customer_repo
            .find_or_create(&Customer::new(dto.name, &dto.phone, dto.email))
            .await?;

        let category = VehicleCategory::parse(dto.category.as_deref().unwrap_or_default());
        let vehicle = Vehicle::new(customer.id, dto.brand, dto.model, &dto.plate, category);
        let vehicle = self.vehicle_repo.create(&vehicle).await?;
        info!(customer_id = customer.id, vehicle_id = vehicle.id, plate = %vehicle.plate, "Vehicle registered");

        Ok((customer, vehicle))
    }

    async fn get_profile(&self, customer_id: i64) -> Result<CustomerProfile, CustomerError> {
        let customer = self.require_customer(customer_id).await?;
        let vehicles = self.vehicle_repo.find_by_customer(customer_id).await?;
        let wash_jobs = self.wash_job_repo.find_by_customer(customer_id).await?;

        let total_paid = wash_jobs
            .iter()
            .filter(|view| view.job.is_completed())
            .map(|view| view.job.total_amount)
            .sum();

        Ok(CustomerProfile {
            customer,
            vehicles,
            wash_jobs,
            total_paid,
        })
    }

    async fn get_history(&self, customer_id: i64) -> Result<Vec<WashJobView>, CustomerError> {
        self.require_customer(customer_id).await?;
        Ok(self
            .wash_job_repo
            .find_completed_by_customer(customer_id)
            .await?)
    }

    async fn recent_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.customer_repo.find_recent(RECENT_CUSTOMERS).await?)
    }

    async fn delete_customer(&self, customer_id: i64) -> Result<CascadeSummary, CustomerError> {
        let summary = self
            .customer_repo
            .delete_cascade(customer_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => CustomerError::NotFound(customer_id),
                e => CustomerError::Repository(e),
            })?;

        info!(
            customer_id,
            vehicles = summary.vehicles,
            wash_jobs = summary.wash_jobs,
            "Customer deleted with cascade"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MockCustomerRepository, MockVehicleRepository, MockWashJobRepository, WashJob, WashStatus,
    };
    use fake::faker::name::en::Name;
    use fake::Fake;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn service(
        customers: MockCustomerRepository,
        vehicles: MockVehicleRepository,
        jobs: MockWashJobRepository,
    ) -> CustomerServiceImpl<MockCustomerRepository, MockVehicleRepository, MockWashJobRepository>
    {
        CustomerServiceImpl::new(Arc::new(customers), Arc::new(vehicles), Arc::new(jobs))
    }

    fn stored(customer: &Customer, id: i64) -> Customer {
        Customer {
            id,
            ..customer.clone()
        }
    }

    fn view(customer_id: i64, total: Decimal, status: WashStatus) -> WashJobView {
        let mut job = WashJob::start(1, 1, Decimal::ZERO, total, None);
        job.status = status;
        WashJobView {
            job,
            plate: "ABC1234".into(),
            brand: "Fiat".into(),
            model: "Uno".into(),
            category: VehicleCategory::Hatch,
            customer_id,
            customer_name: "Ana".into(),
            customer_phone: "1199".into(),
            service_name: None,
        }
    }

    #[tokio::test]
    async fn test_create_customer_normalizes_before_upsert() {
        let name: String = Name().fake();
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_or_create()
            .withf(|c| c.phone == "11988887777" && c.email.is_none())
            .times(1)
            .returning(|c| Ok(stored(c, 5)));

        let svc = service(customers, MockVehicleRepository::new(), MockWashJobRepository::new());
        let customer = svc
            .create_customer(CreateCustomerDto {
                name: name.clone(),
                phone: " 11988887777 ".into(),
                email: Some("".into()),
            })
            .await
            .unwrap();

        assert_eq!(customer.id, 5);
        assert_eq!(customer.name, name.trim());
    }

    #[tokio::test]
    async fn test_create_customer_requires_phone() {
        let svc = service(
            MockCustomerRepository::new(),
            MockVehicleRepository::new(),
            MockWashJobRepository::new(),
        );

        let result = svc
            .create_customer(CreateCustomerDto {
                name: "Ana".into(),
                phone: "   ".into(),
                email: None,
            })
            .await;

        assert!(matches!(result, Err(CustomerError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_register_with_vehicle_conflict_on_duplicate_plate() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_or_create()
            .returning(|c| Ok(stored(c, 2)));
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_create()
            .withf(|v| v.plate == "ABC1D23" && v.customer_id == 2)
            .returning(|v| Err(AppError::Conflict(format!("Plate {} is already registered", v.plate))));

        let svc = service(customers, vehicles, MockWashJobRepository::new());
        let result = svc
            .register_with_vehicle(RegisterCustomerVehicleDto {
                name: "Ana".into(),
                phone: "1199".into(),
                email: None,
                brand: "Fiat".into(),
                model: "Uno".into(),
                plate: "abc1d23".into(),
                category: Some("sedan".into()),
            })
            .await;

        let err: AppError = result.unwrap_err().into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_with_vehicle_defaults_category() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_or_create()
            .returning(|c| Ok(stored(c, 2)));
        let mut vehicles = MockVehicleRepository::new();
        vehicles.expect_create().returning(|v| {
            Ok(Vehicle {
                id: 11,
                ..v.clone()
            })
        });

        let svc = service(customers, vehicles, MockWashJobRepository::new());
        let (customer, vehicle) = svc
            .register_with_vehicle(RegisterCustomerVehicleDto {
                name: "Ana".into(),
                phone: "1199".into(),
                email: None,
                brand: "VW".into(),
                model: "Gol".into(),
                plate: "xyz 9876".into(),
                category: None,
            })
            .await
            .unwrap();

        assert_eq!(customer.id, 2);
        assert_eq!(vehicle.id, 11);
        assert_eq!(vehicle.plate, "XYZ9876");
        assert_eq!(vehicle.category, VehicleCategory::Hatch);
    }

    #[tokio::test]
    async fn test_profile_sums_completed_jobs_only() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_by_id()
            .with(eq(3))
            .returning(|_| Ok(Some(stored(&Customer::new("Ana", "1199", None), 3))));
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_find_by_customer()
            .with(eq(3))
            .returning(|_| Ok(vec![]));
        let mut jobs = MockWashJobRepository::new();
        jobs.expect_find_by_customer().with(eq(3)).returning(|id| {
            Ok(vec![
                view(id, dec!(60), WashStatus::Completed),
                view(id, dec!(45.50), WashStatus::Completed),
                view(id, dec!(80), WashStatus::InProgress),
            ])
        });

        let svc = service(customers, vehicles, jobs);
        let profile = svc.get_profile(3).await.unwrap();

        assert_eq!(profile.total_paid, dec!(105.50));
        assert_eq!(profile.wash_jobs.len(), 3);
    }

    #[tokio::test]
    async fn test_history_of_missing_customer_is_not_found() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(customers, MockVehicleRepository::new(), MockWashJobRepository::new());
        let result = svc.get_history(99).await;

        assert!(matches!(result, Err(CustomerError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_customer_reports_cascade() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_delete_cascade()
            .with(eq(4))
            .times(1)
            .returning(|_| {
                Ok(CascadeSummary {
                    vehicles: 2,
                    wash_jobs: 5,
                })
            });

        let svc = service(customers, MockVehicleRepository::new(), MockWashJobRepository::new());
        let summary = svc.delete_customer(4).await.unwrap();

        assert_eq!(
            summary,
            CascadeSummary {
                vehicles: 2,
                wash_jobs: 5
            }
        );
    }

    #[tokio::test]
    async fn test_delete_missing_customer() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_delete_cascade()
            .returning(|id| Err(AppError::NotFound(format!("Customer with id {} not found", id))));

        let svc = service(customers, MockVehicleRepository::new(), MockWashJobRepository::new());
        let err: AppError = svc.delete_customer(8).await.unwrap_err().into();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recent_customers_limit() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_recent()
            .with(eq(RECENT_CUSTOMERS))
            .returning(|_| Ok(vec![]));

        let svc = service(customers, MockVehicleRepository::new(), MockWashJobRepository::new());
        assert!(svc.recent_customers().await.unwrap().is_empty());
    }
}
