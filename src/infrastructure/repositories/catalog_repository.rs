//! Service Catalog Repository Implementation
//!
//! PostgreSQL implementation of the ServiceCatalogRepository trait.
//! Fixed products live in the `service_products` junction table and are
//! aggregated into `product_ids` on read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{ServiceCatalogEntry, ServiceCatalogRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    name: String,
    price_hatch: Decimal,
    price_sedan: Decimal,
    price_suv: Decimal,
    price_pickup: Decimal,
    product_ids: Vec<i64>,
    created_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_entry(self) -> ServiceCatalogEntry {
        ServiceCatalogEntry {
            id: self.id,
            name: self.name,
            price_hatch: self.price_hatch,
            price_sedan: self.price_sedan,
            price_suv: self.price_suv,
            price_pickup: self.price_pickup,
            product_ids: self.product_ids,
            created_at: self.created_at,
        }
    }
}

const SELECT_SERVICES: &str = r#"
    SELECT s.id, s.name, s.price_hatch, s.price_sedan, s.price_suv, s.price_pickup,
           COALESCE(
               ARRAY_AGG(sp.product_id ORDER BY sp.product_id)
                   FILTER (WHERE sp.product_id IS NOT NULL),
               '{}'
           ) AS product_ids,
           s.created_at
    FROM service_catalog s
    LEFT JOIN service_products sp ON sp.service_id = s.id
"#;

/// PostgreSQL service catalog repository implementation.
#[derive(Clone)]
pub struct PgServiceCatalogRepository {
    pool: PgPool,
}

impl PgServiceCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceCatalogRepository for PgServiceCatalogRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceCatalogEntry>, AppError> {
        let sql = format!("{SELECT_SERVICES} WHERE s.id = $1 GROUP BY s.id");
        let row = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_entry()))
    }

    async fn find_all(&self) -> Result<Vec<ServiceCatalogEntry>, AppError> {
        let sql = format!("{SELECT_SERVICES} GROUP BY s.id ORDER BY s.name ASC, s.id ASC");
        let rows = sqlx::query_as::<_, ServiceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_entry()).collect())
    }

    async fn create(&self, entry: &ServiceCatalogEntry) -> Result<ServiceCatalogEntry, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            r#"
            INSERT INTO service_catalog (name, price_hatch, price_sedan, price_suv, price_pickup)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(&entry.name)
        .bind(entry.price_hatch)
        .bind(entry.price_sedan)
        .bind(entry.price_suv)
        .bind(entry.price_pickup)
        .fetch_one(&mut *tx)
        .await?;

        // Only products that exist get linked
        let mut product_ids = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO service_products (service_id, product_id)
            SELECT $1, p.id FROM products p WHERE p.id = ANY($2)
            ON CONFLICT DO NOTHING
            RETURNING product_id
            "#,
        )
        .bind(id)
        .bind(&entry.product_ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        product_ids.sort_unstable();

        Ok(ServiceCatalogEntry {
            id,
            name: entry.name.clone(),
            price_hatch: entry.price_hatch,
            price_sedan: entry.price_sedan,
            price_suv: entry.price_suv,
            price_pickup: entry.price_pickup,
            product_ids,
            created_at,
        })
    }

    /// Jobs that used the service keep their row with `service_id` cleared.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM service_catalog WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Service with id {} not found", id)));
        }

        Ok(())
    }
}
