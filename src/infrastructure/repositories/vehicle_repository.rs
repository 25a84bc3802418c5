//! Vehicle Repository Implementation
//!
//! PostgreSQL implementation of the VehicleRepository trait.
//! Plates are unique; a duplicate insert surfaces as `AppError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Vehicle, VehicleCategory, VehicleRepository, VehicleWithOwner};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: i64,
    customer_id: i64,
    brand: String,
    model: String,
    plate: String,
    category: String,
    created_at: DateTime<Utc>,
}

impl VehicleRow {
    fn into_vehicle(self) -> Vehicle {
        Vehicle {
            id: self.id,
            customer_id: self.customer_id,
            brand: self.brand,
            model: self.model,
            plate: self.plate,
            category: VehicleCategory::parse(&self.category),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VehicleOwnerRow {
    id: i64,
    customer_id: i64,
    brand: String,
    model: String,
    plate: String,
    category: String,
    created_at: DateTime<Utc>,
    owner_name: String,
    owner_phone: String,
}

impl VehicleOwnerRow {
    fn into_vehicle_with_owner(self) -> VehicleWithOwner {
        VehicleWithOwner {
            vehicle: Vehicle {
                id: self.id,
                customer_id: self.customer_id,
                brand: self.brand,
                model: self.model,
                plate: self.plate,
                category: VehicleCategory::parse(&self.category),
                created_at: self.created_at,
            },
            owner_name: self.owner_name,
            owner_phone: self.owner_phone,
        }
    }
}

/// PostgreSQL vehicle repository implementation.
#[derive(Clone)]
pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            SELECT id, customer_id, brand, model, plate, category, created_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_vehicle()))
    }

    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, AppError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            SELECT id, customer_id, brand, model, plate, category, created_at
            FROM vehicles
            WHERE plate = $1
            "#,
        )
        .bind(Vehicle::normalize_plate(plate))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_vehicle()))
    }

    async fn find_by_customer(&self, customer_id: i64) -> Result<Vec<Vehicle>, AppError> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            r#"
            SELECT id, customer_id, brand, model, plate, category, created_at
            FROM vehicles
            WHERE customer_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_vehicle()).collect())
    }

    async fn find_all_with_owner(&self) -> Result<Vec<VehicleWithOwner>, AppError> {
        let rows = sqlx::query_as::<_, VehicleOwnerRow>(
            r#"
            SELECT v.id, v.customer_id, v.brand, v.model, v.plate, v.category, v.created_at,
                   c.name AS owner_name, c.phone AS owner_phone
            FROM vehicles v
            JOIN customers c ON c.id = v.customer_id
            ORDER BY v.plate ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_vehicle_with_owner()).collect())
    }

    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (customer_id, brand, model, plate, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, brand, model, plate, category, created_at
            "#,
        )
        .bind(vehicle.customer_id)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(&vehicle.plate)
        .bind(vehicle.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Plate {} is already registered", vehicle.plate))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(format!("Customer with id {} not found", vehicle.customer_id))
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_vehicle())
    }

    /// Existing plates are returned untouched, whoever owns them.
    async fn find_or_create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (customer_id, brand, model, plate, category)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (plate) DO UPDATE SET plate = EXCLUDED.plate
            RETURNING id, customer_id, brand, model, plate, category, created_at
            "#,
        )
        .bind(vehicle.customer_id)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(&vehicle.plate)
        .bind(vehicle.category.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_vehicle())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM wash_jobs WHERE vehicle_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Vehicle with id {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
