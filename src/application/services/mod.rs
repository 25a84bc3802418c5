//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **CustomerService**: Customer registration, profiles, history, cascading delete
//! - **VehicleService**: Vehicle registration and listing
//! - **CatalogService**: Products, services, fixed costs and the hourly rate
//! - **WashJobService**: Wash job lifecycle from intake to receipt
//! - **ReportService**: Financial totals over completed jobs

pub mod catalog_service;
pub mod customer_service;
pub mod report_service;
pub mod vehicle_service;
pub mod wash_job_service;

// Re-export customer service types
pub use customer_service::{
    CreateCustomerDto, CustomerError, CustomerProfile, CustomerService, CustomerServiceImpl,
    RegisterCustomerVehicleDto,
};

// Re-export vehicle service types
pub use vehicle_service::{CreateVehicleDto, VehicleError, VehicleService, VehicleServiceImpl};

// Re-export catalog service types
pub use catalog_service::{
    CatalogError, CatalogService, CatalogServiceImpl, CreateFixedCostDto, CreateProductDto,
    CreateServiceDto, ManagementOverview,
};

// Re-export wash job service types
pub use wash_job_service::{
    ChecklistInput, CompletionInput, CustomerMode, Dashboard, Quote, RegisterWashJobDto,
    WashJobDetails, WashJobError, WashJobService, WashJobServiceImpl,
};

// Re-export report service types
pub use report_service::{ChartPoint, FinancialReport, ReportError, ReportService, ReportServiceImpl};
