//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the shop.
//! All entities map directly to their corresponding database tables.
//!
//! ## Core Entities
//!
//! - **Customer**: identified by phone number, owns vehicles
//! - **Vehicle**: unique plate, category selects the price tier
//! - **WashJob**: one wash from intake to payment
//!
//! ## Catalog Entities
//!
//! - **ServiceCatalogEntry**: per-category prices and fixed products
//! - **Product**: bulk consumable with per-use cost
//! - **FixedCost**: informational recurring expense
//! - **ShopSettings**: hourly labor rate
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod catalog;
mod customer;
mod fixed_cost;
mod product;
mod settings;
mod vehicle;
mod wash_job;

pub use catalog::{ServiceCatalogEntry, ServiceCatalogRepository};
pub use customer::{CascadeSummary, Customer, CustomerRepository, CustomerVisit};
pub use fixed_cost::{FixedCost, FixedCostRepository};
pub use product::{Product, ProductRepository};
pub use settings::{SettingsRepository, ShopSettings};
pub use vehicle::{Vehicle, VehicleRepository, VehicleWithOwner};
pub use wash_job::{
    Checklist, ChecklistUpdate, JobCompletion, WashJob, WashJobRepository, WashJobView, WashStatus,
};

#[cfg(test)]
pub use catalog::MockServiceCatalogRepository;
#[cfg(test)]
pub use customer::MockCustomerRepository;
#[cfg(test)]
pub use fixed_cost::MockFixedCostRepository;
#[cfg(test)]
pub use product::MockProductRepository;
#[cfg(test)]
pub use settings::MockSettingsRepository;
#[cfg(test)]
pub use vehicle::MockVehicleRepository;
#[cfg(test)]
pub use wash_job::MockWashJobRepository;
