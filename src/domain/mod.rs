//! # Domain Layer
//!
//! The domain layer contains the core business logic of the car-wash shop.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (Customer, Vehicle, WashJob, catalog, ...)
//! - **value_objects**: Immutable value types (VehicleCategory, PhotoPaths)
//! - **services**: Pricing rules and the photo storage port
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure business logic and domain rules
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
