//! Product Repository Implementation
//!
//! PostgreSQL implementation of the ProductRepository trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Product, ProductRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    purchase_price: Decimal,
    total_volume: i32,
    volume_per_use: i32,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            purchase_price: self.purchase_price,
            total_volume: self.total_volume,
            volume_per_use: self.volume_per_use,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL product repository implementation.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, purchase_price, total_volume, volume_per_use, created_at
            FROM products
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_product()).collect())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, purchase_price, total_volume, volume_per_use, created_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let by_id: HashMap<i64, Product> = rows
            .into_iter()
            .map(|r| (r.id, r.into_product()))
            .collect();

        // Keep request order and repeated selections
        Ok(ids.iter().filter_map(|id| by_id.get(id).cloned()).collect())
    }

    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, purchase_price, total_volume, volume_per_use)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, purchase_price, total_volume, volume_per_use, created_at
            "#,
        )
        .bind(&product.name)
        .bind(product.purchase_price)
        .bind(product.total_volume)
        .bind(product.volume_per_use)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_product())
    }

    /// Junction rows in service_products go with it (ON DELETE CASCADE).
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product with id {} not found", id)));
        }

        Ok(())
    }
}
