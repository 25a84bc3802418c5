//! Fixed Cost Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{FixedCost, FixedCostRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct FixedCostRow {
    id: i64,
    item: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

impl FixedCostRow {
    fn into_fixed_cost(self) -> FixedCost {
        FixedCost {
            id: self.id,
            item: self.item,
            amount: self.amount,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL fixed cost repository implementation.
#[derive(Clone)]
pub struct PgFixedCostRepository {
    pool: PgPool,
}

impl PgFixedCostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FixedCostRepository for PgFixedCostRepository {
    async fn find_all(&self) -> Result<Vec<FixedCost>, AppError> {
        let rows = sqlx::query_as::<_, FixedCostRow>(
            "SELECT id, item, amount, created_at FROM fixed_costs ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_fixed_cost()).collect())
    }

    async fn create(&self, cost: &FixedCost) -> Result<FixedCost, AppError> {
        let row = sqlx::query_as::<_, FixedCostRow>(
            r#"
            INSERT INTO fixed_costs (item, amount)
            VALUES ($1, $2)
            RETURNING id, item, amount, created_at
            "#,
        )
        .bind(&cost.item)
        .bind(cost.amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_fixed_cost())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM fixed_costs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Fixed cost with id {} not found", id)));
        }

        Ok(())
    }
}
