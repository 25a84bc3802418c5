//! Wash Job Repository Implementation
//!
//! PostgreSQL implementation of the WashJobRepository trait.
//! Views join the vehicle, its owner and the service name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{
    Checklist, ChecklistUpdate, JobCompletion, VehicleCategory, WashJob, WashJobRepository,
    WashJobView, WashStatus,
};
use crate::shared::error::AppError;

const JOB_COLUMNS: &str = r#"
    j.id, j.vehicle_id, j.service_id, j.status, j.started_at, j.finished_at,
    j.adjustment, j.total_amount, j.product_cost, j.labor_cost, j.profit,
    j.total_minutes, j.duration, j.products_used,
    j.checklist_damage, j.checklist_fuel, j.checklist_tires, j.checklist_valuables,
    j.intake_photos, j.outcome_photo
"#;

const VIEW_JOINS: &str = r#"
    FROM wash_jobs j
    JOIN vehicles v ON v.id = j.vehicle_id
    JOIN customers c ON c.id = v.customer_id
    LEFT JOIN service_catalog s ON s.id = j.service_id
"#;

const VIEW_EXTRA_COLUMNS: &str = r#"
    v.plate, v.brand, v.model, v.category,
    c.id AS customer_id, c.name AS customer_name, c.phone AS customer_phone,
    s.name AS service_name
"#;

/// Database row representation of the wash_jobs table.
#[derive(Debug, sqlx::FromRow)]
struct WashJobRow {
    id: i64,
    vehicle_id: i64,
    service_id: Option<i64>,
    status: String,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    adjustment: Decimal,
    total_amount: Decimal,
    product_cost: Decimal,
    labor_cost: Decimal,
    profit: Decimal,
    total_minutes: i32,
    duration: Option<String>,
    products_used: Option<String>,
    checklist_damage: Option<String>,
    checklist_fuel: Option<String>,
    checklist_tires: Option<String>,
    checklist_valuables: Option<String>,
    intake_photos: Option<String>,
    outcome_photo: Option<String>,
}

impl WashJobRow {
    fn into_wash_job(self) -> WashJob {
        WashJob {
            id: self.id,
            vehicle_id: self.vehicle_id,
            service_id: self.service_id,
            status: WashStatus::parse(&self.status),
            started_at: self.started_at,
            finished_at: self.finished_at,
            adjustment: self.adjustment,
            total_amount: self.total_amount,
            product_cost: self.product_cost,
            labor_cost: self.labor_cost,
            profit: self.profit,
            total_minutes: self.total_minutes,
            duration: self.duration,
            products_used: self.products_used,
            checklist: Checklist {
                damage: self.checklist_damage,
                fuel: self.checklist_fuel,
                tires: self.checklist_tires,
                valuables: self.checklist_valuables,
            },
            intake_photos: self.intake_photos,
            outcome_photo: self.outcome_photo,
        }
    }
}

/// Job row plus the joined vehicle, customer and service columns.
#[derive(Debug, sqlx::FromRow)]
struct WashJobViewRow {
    #[sqlx(flatten)]
    job: WashJobRow,
    plate: String,
    brand: String,
    model: String,
    category: String,
    customer_id: i64,
    customer_name: String,
    customer_phone: String,
    service_name: Option<String>,
}

impl WashJobViewRow {
    fn into_view(self) -> WashJobView {
        WashJobView {
            job: self.job.into_wash_job(),
            plate: self.plate,
            brand: self.brand,
            model: self.model,
            category: VehicleCategory::parse(&self.category),
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            service_name: self.service_name,
        }
    }
}

/// Appends the text parameter `$n` to the stored photo list in place.
fn append_intake_photo(param: usize) -> String {
    format!("NULLIF(CONCAT_WS(',', NULLIF(j.intake_photos, ''), ${param}::TEXT), '')")
}

fn view_query(filter_and_order: &str) -> String {
    format!("SELECT {JOB_COLUMNS}, {VIEW_EXTRA_COLUMNS} {VIEW_JOINS} {filter_and_order}")
}

/// PostgreSQL wash job repository implementation.
#[derive(Clone)]
pub struct PgWashJobRepository {
    pool: PgPool,
}

impl PgWashJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_views(&self, sql: &str, bind: Option<i64>) -> Result<Vec<WashJobView>, AppError> {
        let mut query = sqlx::query_as::<_, WashJobViewRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(|r| r.into_view()).collect())
    }
}

#[async_trait]
impl WashJobRepository for PgWashJobRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<WashJob>, AppError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM wash_jobs j WHERE j.id = $1");
        let row = sqlx::query_as::<_, WashJobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_wash_job()))
    }

    async fn find_view_by_id(&self, id: i64) -> Result<Option<WashJobView>, AppError> {
        let sql = view_query("WHERE j.id = $1");
        let row = sqlx::query_as::<_, WashJobViewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_view()))
    }

    async fn find_all_views(&self) -> Result<Vec<WashJobView>, AppError> {
        let sql = view_query("ORDER BY j.id DESC");
        self.fetch_views(&sql, None).await
    }

    async fn find_by_customer(&self, customer_id: i64) -> Result<Vec<WashJobView>, AppError> {
        let sql = view_query("WHERE c.id = $1 ORDER BY j.started_at DESC, j.id DESC");
        self.fetch_views(&sql, Some(customer_id)).await
    }

    async fn find_completed_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<WashJobView>, AppError> {
        let sql = view_query(
            "WHERE c.id = $1 AND j.status = 'completed' ORDER BY j.finished_at DESC, j.id DESC",
        );
        self.fetch_views(&sql, Some(customer_id)).await
    }

    async fn find_completed(&self) -> Result<Vec<WashJob>, AppError> {
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM wash_jobs j WHERE j.status = 'completed' ORDER BY j.id ASC"
        );
        let rows = sqlx::query_as::<_, WashJobRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_wash_job()).collect())
    }

    async fn create(&self, job: &WashJob) -> Result<WashJob, AppError> {
        let sql = format!(
            r#"
            INSERT INTO wash_jobs AS j (
                vehicle_id, service_id, status, started_at, adjustment, total_amount,
                checklist_damage, checklist_fuel, checklist_tires, checklist_valuables,
                intake_photos
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {JOB_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, WashJobRow>(&sql)
            .bind(job.vehicle_id)
            .bind(job.service_id)
            .bind(job.status.as_str())
            .bind(job.started_at)
            .bind(job.adjustment)
            .bind(job.total_amount)
            .bind(&job.checklist.damage)
            .bind(&job.checklist.fuel)
            .bind(&job.checklist.tires)
            .bind(&job.checklist.valuables)
            .bind(&job.intake_photos)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    AppError::NotFound("Vehicle or service not found".to_string())
                }
                _ => AppError::Database(e),
            })?;

        Ok(row.into_wash_job())
    }

    async fn save_checklist(&self, id: i64, update: &ChecklistUpdate) -> Result<Option<WashJob>, AppError> {
        let sql = format!(
            r#"
            UPDATE wash_jobs AS j
            SET checklist_fuel = $2,
                checklist_damage = COALESCE($3, j.checklist_damage),
                checklist_tires = COALESCE($4, j.checklist_tires),
                checklist_valuables = COALESCE($5, j.checklist_valuables),
                intake_photos = {append}
            WHERE j.id = $1
            RETURNING {JOB_COLUMNS}
            "#,
            append = append_intake_photo(6),
        );
        let row = sqlx::query_as::<_, WashJobRow>(&sql)
            .bind(id)
            .bind(&update.fuel)
            .bind(&update.damage)
            .bind(&update.tires)
            .bind(&update.valuables)
            .bind(&update.new_photos)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_wash_job()))
    }

    /// Guarded on the stored status so two completions cannot both win.
    async fn complete(&self, id: i64, completion: &JobCompletion) -> Result<Option<WashJob>, AppError> {
        let sql = format!(
            r#"
            UPDATE wash_jobs AS j
            SET status = 'completed',
                finished_at = $2,
                total_amount = $3,
                product_cost = $4,
                labor_cost = $5,
                profit = $6,
                total_minutes = $7,
                duration = $8,
                products_used = $9,
                intake_photos = {append},
                outcome_photo = COALESCE($11, j.outcome_photo)
            WHERE j.id = $1 AND j.status = 'in_progress'
            RETURNING {JOB_COLUMNS}
            "#,
            append = append_intake_photo(10),
        );
        let row = sqlx::query_as::<_, WashJobRow>(&sql)
            .bind(id)
            .bind(completion.finished_at)
            .bind(completion.total_amount)
            .bind(completion.product_cost)
            .bind(completion.labor_cost)
            .bind(completion.profit)
            .bind(completion.total_minutes)
            .bind(&completion.duration)
            .bind(&completion.products_used)
            .bind(&completion.before_photo)
            .bind(&completion.outcome_photo)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_wash_job()))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM wash_jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Wash job with id {} not found", id)));
        }

        Ok(())
    }
}
