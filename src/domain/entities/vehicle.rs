//! Vehicle entity and repository trait.
//!
//! Maps to the `vehicles` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::VehicleCategory;
use crate::shared::error::AppError;

/// A customer's vehicle.
///
/// Maps to the `vehicles` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - customer_id: BIGINT NOT NULL REFERENCES customers(id) ON DELETE CASCADE
/// - brand: VARCHAR(60) NOT NULL
/// - model: VARCHAR(60) NOT NULL
/// - plate: VARCHAR(16) NOT NULL UNIQUE (upper-case)
/// - category: VARCHAR(16) NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub customer_id: i64,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub category: VehicleCategory,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Build an unsaved vehicle. The plate is normalized.
    pub fn new(
        customer_id: i64,
        brand: impl Into<String>,
        model: impl Into<String>,
        plate: &str,
        category: VehicleCategory,
    ) -> Self {
        Self {
            id: 0,
            customer_id,
            brand: brand.into().trim().to_string(),
            model: model.into().trim().to_string(),
            plate: Self::normalize_plate(plate),
            category,
            created_at: Utc::now(),
        }
    }

    /// Plates are unique regardless of case and spacing.
    pub fn normalize_plate(raw: &str) -> String {
        raw.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    }

    /// "Model (Brand)" as printed on receipts.
    pub fn description(&self) -> String {
        format!("{} ({})", self.model, self.brand)
    }
}

/// Vehicle with its owner's name and phone, used for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleWithOwner {
    pub vehicle: Vehicle,
    pub owner_name: String,
    pub owner_phone: String,
}

/// Repository trait for Vehicle data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError>;

    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, AppError>;

    async fn find_by_customer(&self, customer_id: i64) -> Result<Vec<Vehicle>, AppError>;

    async fn find_all_with_owner(&self) -> Result<Vec<VehicleWithOwner>, AppError>;

    /// Insert a vehicle. Fails with `AppError::Conflict` when the plate exists.
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;

    /// Return the vehicle with this plate, creating it if absent.
    async fn find_or_create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;

    /// Delete a vehicle and its wash jobs.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
