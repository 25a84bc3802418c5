//! Service catalog entry and repository trait.
//!
//! Maps to the `service_catalog` and `service_products` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::VehicleCategory;
use crate::shared::error::AppError;

/// A service offered by the shop with a price per vehicle category.
///
/// Maps to the `service_catalog` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(120) NOT NULL
/// - price_hatch / price_sedan / price_suv / price_pickup: NUMERIC(12,2) NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// The products a service always consumes are stored in the
/// `service_products` junction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    pub id: i64,
    pub name: String,
    pub price_hatch: Decimal,
    pub price_sedan: Decimal,
    pub price_suv: Decimal,
    pub price_pickup: Decimal,

    /// IDs of the fixed products (loaded from service_products)
    #[serde(default)]
    pub product_ids: Vec<i64>,

    pub created_at: DateTime<Utc>,
}

impl ServiceCatalogEntry {
    /// Base price for a vehicle category.
    pub fn price_for(&self, category: VehicleCategory) -> Decimal {
        match category {
            VehicleCategory::Hatch => self.price_hatch,
            VehicleCategory::Sedan => self.price_sedan,
            VehicleCategory::Suv => self.price_suv,
            VehicleCategory::Pickup => self.price_pickup,
        }
    }
}

impl Default for ServiceCatalogEntry {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            price_hatch: Decimal::ZERO,
            price_sedan: Decimal::ZERO,
            price_suv: Decimal::ZERO,
            price_pickup: Decimal::ZERO,
            product_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for service catalog data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceCatalogRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceCatalogEntry>, AppError>;

    async fn find_all(&self) -> Result<Vec<ServiceCatalogEntry>, AppError>;

    /// Insert the entry and its fixed products. Product IDs that do not
    /// exist are ignored; the returned entry lists only the linked ones.
    async fn create(&self, entry: &ServiceCatalogEntry) -> Result<ServiceCatalogEntry, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
