//! Wash job entity and repository trait.
//!
//! Maps to the `wash_jobs` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{PhotoPaths, VehicleCategory};
use crate::shared::error::AppError;

/// Lifecycle of a wash job. Jobs only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WashStatus {
    #[default]
    InProgress,
    Completed,
}

impl WashStatus {
    /// Convert from database string representation.
    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            _ => Self::InProgress,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for WashStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intake inspection notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub damage: Option<String>,
    pub fuel: Option<String>,
    pub tires: Option<String>,
    pub valuables: Option<String>,
}

/// One vehicle-service transaction from intake to payment.
///
/// Maps to the `wash_jobs` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - vehicle_id: BIGINT NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE
/// - service_id: BIGINT NULL REFERENCES service_catalog(id) ON DELETE SET NULL
/// - status: VARCHAR(16) NOT NULL ('in_progress' | 'completed')
/// - started_at: TIMESTAMPTZ NOT NULL
/// - finished_at: TIMESTAMPTZ NULL, never before started_at
/// - adjustment, total_amount, product_cost, labor_cost, profit: NUMERIC(12,2)
/// - total_minutes: INTEGER, duration: VARCHAR(16) ("HH:MM")
/// - products_used: TEXT (comma-joined names)
/// - checklist_damage / checklist_fuel / checklist_tires / checklist_valuables: TEXT
/// - intake_photos: TEXT (comma-joined paths), outcome_photo: TEXT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashJob {
    pub id: i64,
    pub vehicle_id: i64,
    pub service_id: Option<i64>,
    pub status: WashStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Manual surcharge entered at registration (dirt level, extras)
    pub adjustment: Decimal,

    /// Amount charged: the suggested price at registration, then the staff
    /// override at completion
    pub total_amount: Decimal,

    pub product_cost: Decimal,
    pub labor_cost: Decimal,
    pub profit: Decimal,
    pub total_minutes: i32,
    pub duration: Option<String>,
    pub products_used: Option<String>,
    pub checklist: Checklist,
    pub intake_photos: Option<String>,
    pub outcome_photo: Option<String>,
}

impl WashJob {
    /// A freshly registered job.
    pub fn start(
        vehicle_id: i64,
        service_id: i64,
        adjustment: Decimal,
        suggested_price: Decimal,
        intake_notes: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            vehicle_id,
            service_id: Some(service_id),
            status: WashStatus::InProgress,
            started_at: Utc::now(),
            finished_at: None,
            adjustment,
            total_amount: suggested_price,
            product_cost: Decimal::ZERO,
            labor_cost: Decimal::ZERO,
            profit: Decimal::ZERO,
            total_minutes: 0,
            duration: None,
            products_used: None,
            checklist: Checklist {
                damage: intake_notes,
                ..Default::default()
            },
            intake_photos: None,
            outcome_photo: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == WashStatus::Completed
    }

    pub fn intake_photo_paths(&self) -> PhotoPaths {
        PhotoPaths::parse(self.intake_photos.as_deref())
    }
}

/// Checklist columns written by an intake save. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChecklistUpdate {
    pub fuel: String,
    pub damage: Option<String>,
    pub tires: Option<String>,
    pub valuables: Option<String>,
    /// Comma-joined paths appended to the intake photos
    pub new_photos: Option<String>,
}

/// Columns written when a job is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCompletion {
    pub finished_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub product_cost: Decimal,
    pub labor_cost: Decimal,
    pub profit: Decimal,
    pub total_minutes: i32,
    pub duration: String,
    pub products_used: Option<String>,
    /// Appended to the intake photos
    pub before_photo: Option<String>,
    pub outcome_photo: Option<String>,
}

/// A wash job joined with its vehicle, customer and service name.
#[derive(Debug, Clone, PartialEq)]
pub struct WashJobView {
    pub job: WashJob,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub category: VehicleCategory,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_name: Option<String>,
}

/// Repository trait for WashJob data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WashJobRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<WashJob>, AppError>;

    async fn find_view_by_id(&self, id: i64) -> Result<Option<WashJobView>, AppError>;

    /// All jobs, newest first.
    async fn find_all_views(&self) -> Result<Vec<WashJobView>, AppError>;

    /// Every job of a customer's vehicles, newest start first.
    async fn find_by_customer(&self, customer_id: i64) -> Result<Vec<WashJobView>, AppError>;

    /// Completed jobs of a customer's vehicles, newest finish first.
    async fn find_completed_by_customer(&self, customer_id: i64) -> Result<Vec<WashJobView>, AppError>;

    /// All completed jobs in registration order.
    async fn find_completed(&self) -> Result<Vec<WashJob>, AppError>;

    async fn create(&self, job: &WashJob) -> Result<WashJob, AppError>;

    /// Write the checklist columns and append intake photos, leaving status
    /// and costing alone. `None` when the job does not exist.
    async fn save_checklist(&self, id: i64, update: &ChecklistUpdate) -> Result<Option<WashJob>, AppError>;

    /// Close a job that is still in progress. `None` when no in-progress job
    /// has this id.
    async fn complete(&self, id: i64, completion: &JobCompletion) -> Result<Option<WashJob>, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_start_sets_in_progress() {
        let job = WashJob::start(4, 2, dec!(5), dec!(45), Some("Risco na porta".into()));

        assert_eq!(job.status, WashStatus::InProgress);
        assert_eq!(job.total_amount, dec!(45));
        assert_eq!(job.adjustment, dec!(5));
        assert_eq!(job.service_id, Some(2));
        assert_eq!(job.checklist.damage.as_deref(), Some("Risco na porta"));
        assert!(job.finished_at.is_none());
        assert!(!job.is_completed());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(WashStatus::parse("completed"), WashStatus::Completed);
        assert_eq!(WashStatus::parse("in_progress"), WashStatus::InProgress);
        assert_eq!(WashStatus::Completed.to_string(), "completed");
        assert_eq!(
            serde_json::to_string(&WashStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
