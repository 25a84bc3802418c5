//! Customer entity and repository trait.
//!
//! Maps to the `customers` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A customer of the shop.
///
/// Maps to the `customers` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(120) NOT NULL
/// - phone: VARCHAR(32) NOT NULL UNIQUE
/// - email: VARCHAR(255) NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// The phone number is the natural key: customers are looked up and
/// deduplicated by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Build an unsaved customer. Phone and email are normalized.
    pub fn new(name: impl Into<String>, phone: &str, email: Option<String>) -> Self {
        Self {
            id: 0,
            name: name.into().trim().to_string(),
            phone: Self::normalize_phone(phone),
            email: email
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
            created_at: Utc::now(),
        }
    }

    /// Normalize a phone number for lookups: surrounding whitespace is ignored.
    pub fn normalize_phone(raw: &str) -> String {
        raw.trim().to_string()
    }
}

/// A customer together with the start of their latest completed wash.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerVisit {
    pub customer: Customer,
    pub last_visit: Option<DateTime<Utc>>,
}

impl CustomerVisit {
    /// Whole days since the last completed wash, `None` if they never had one.
    pub fn days_absent(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_visit.map(|last| (now - last).num_days().max(0))
    }
}

/// Rows removed by a cascading customer delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub vehicles: u64,
    pub wash_jobs: u64,
}

/// Repository trait for Customer data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find a customer by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError>;

    /// Find a customer by normalized phone number.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError>;

    /// Return the customer with this phone, creating it if absent.
    ///
    /// Never creates a second row for the same phone.
    async fn find_or_create(&self, customer: &Customer) -> Result<Customer, AppError>;

    /// Newest customers first.
    async fn find_recent(&self, limit: i64) -> Result<Vec<Customer>, AppError>;

    /// All customers with the start time of their latest completed wash.
    async fn find_all_with_last_visit(&self) -> Result<Vec<CustomerVisit>, AppError>;

    /// Delete a customer with all their vehicles and wash jobs.
    async fn delete_cascade(&self, id: i64) -> Result<CascadeSummary, AppError>;
}
