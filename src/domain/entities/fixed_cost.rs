//! Fixed cost entity and repository trait.
//!
//! Maps to the `fixed_costs` table. Fixed costs (rent, water, ...) are
//! informational and never enter job costing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: i64,
    pub item: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl FixedCost {
    pub fn new(item: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: 0,
            item: item.into().trim().to_string(),
            amount,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for FixedCost data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FixedCostRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<FixedCost>, AppError>;

    async fn create(&self, cost: &FixedCost) -> Result<FixedCost, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
