//! Product (consumable) entity and repository trait.
//!
//! Maps to the `products` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::services::PricingService;
use crate::shared::error::AppError;

/// A consumable bought in bulk (shampoo, wax, ...) and used in doses.
///
/// Maps to the `products` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(120) NOT NULL
/// - purchase_price: NUMERIC(12,2) NOT NULL
/// - total_volume: INTEGER NOT NULL (ml in the bulk package)
/// - volume_per_use: INTEGER NOT NULL (ml per wash)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub purchase_price: Decimal,
    pub total_volume: i32,
    pub volume_per_use: i32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        purchase_price: Decimal,
        total_volume: i32,
        volume_per_use: i32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into().trim().to_string(),
            purchase_price,
            total_volume,
            volume_per_use,
            created_at: Utc::now(),
        }
    }

    /// Cost of one dose of this product.
    pub fn per_use_cost(&self) -> Decimal {
        PricingService::per_use_cost(self.purchase_price, self.total_volume, self.volume_per_use)
    }
}

/// Repository trait for Product data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by name.
    async fn find_all(&self) -> Result<Vec<Product>, AppError>;

    /// Products with the given IDs. Unknown IDs are skipped; each ID is
    /// returned once per occurrence in `ids`.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, AppError>;

    async fn create(&self, product: &Product) -> Result<Product, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
