//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **CustomerRepository** - Customers deduplicated by phone, cascading delete
//! - **VehicleRepository** - Vehicles with unique plates
//! - **ProductRepository** - Consumables and their dose volumes
//! - **ServiceCatalogRepository** - Services with per-category prices and fixed products
//! - **FixedCostRepository** - Informational recurring expenses
//! - **SettingsRepository** - Single-row shop settings
//! - **WashJobRepository** - Wash jobs and their joined views
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgCustomerRepository, PgWashJobRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let customer_repo = PgCustomerRepository::new(pool.clone());
//!     let wash_job_repo = PgWashJobRepository::new(pool.clone());
//! }
//! ```

pub mod catalog_repository;
pub mod customer_repository;
pub mod fixed_cost_repository;
pub mod product_repository;
pub mod settings_repository;
pub mod vehicle_repository;
pub mod wash_job_repository;

pub use catalog_repository::PgServiceCatalogRepository;
pub use customer_repository::PgCustomerRepository;
pub use fixed_cost_repository::PgFixedCostRepository;
pub use product_repository::PgProductRepository;
pub use settings_repository::PgSettingsRepository;
pub use vehicle_repository::PgVehicleRepository;
pub use wash_job_repository::PgWashJobRepository;
