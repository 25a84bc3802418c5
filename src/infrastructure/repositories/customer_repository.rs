//! Customer Repository Implementation
//!
//! PostgreSQL implementation of the CustomerRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{CascadeSummary, Customer, CustomerRepository, CustomerVisit};
use crate::shared::error::AppError;

/// Database row representation of the customers table.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    phone: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> Customer {
        Customer {
            id: self.id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

/// Customer row joined with the start of the latest completed job.
#[derive(Debug, sqlx::FromRow)]
struct CustomerVisitRow {
    id: i64,
    name: String,
    phone: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    last_visit: Option<DateTime<Utc>>,
}

impl CustomerVisitRow {
    fn into_visit(self) -> CustomerVisit {
        CustomerVisit {
            customer: Customer {
                id: self.id,
                name: self.name,
                phone: self.phone,
                email: self.email,
                created_at: self.created_at,
            },
            last_visit: self.last_visit,
        }
    }
}

/// PostgreSQL customer repository implementation.
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new PgCustomerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, email, created_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_customer()))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, email, created_at
            FROM customers
            WHERE phone = $1
            "#,
        )
        .bind(Customer::normalize_phone(phone))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_customer()))
    }

    /// Upsert on the unique phone index. An existing row keeps its name;
    /// its email is only filled in when it had none.
    async fn find_or_create(&self, customer: &Customer) -> Result<Customer, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (name, phone, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (phone) DO UPDATE
                SET email = COALESCE(customers.email, EXCLUDED.email)
            RETURNING id, name, phone, email, created_at
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_customer())
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, email, created_at
            FROM customers
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_customer()).collect())
    }

    async fn find_all_with_last_visit(&self) -> Result<Vec<CustomerVisit>, AppError> {
        let rows = sqlx::query_as::<_, CustomerVisitRow>(
            r#"
            SELECT c.id, c.name, c.phone, c.email, c.created_at,
                   MAX(j.started_at) FILTER (WHERE j.status = 'completed') AS last_visit
            FROM customers c
            LEFT JOIN vehicles v ON v.customer_id = c.id
            LEFT JOIN wash_jobs j ON j.vehicle_id = v.id
            GROUP BY c.id
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_visit()).collect())
    }

    /// Remove wash jobs, vehicles and the customer in one transaction.
    async fn delete_cascade(&self, id: i64) -> Result<CascadeSummary, AppError> {
        let mut tx = self.pool.begin().await?;

        let wash_jobs = sqlx::query(
            r#"
            DELETE FROM wash_jobs
            WHERE vehicle_id IN (SELECT id FROM vehicles WHERE customer_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let vehicles = sqlx::query("DELETE FROM vehicles WHERE customer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Customer with id {} not found", id)));
        }

        tx.commit().await?;

        Ok(CascadeSummary { vehicles, wash_jobs })
    }
}
