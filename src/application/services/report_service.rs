//! Report Service
//!
//! Financial totals over completed wash jobs.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::services::PricingService;
use crate::domain::{WashJob, WashJobRepository};
use crate::shared::error::AppError;

/// Number of jobs plotted on the revenue chart.
pub const CHART_SIZE: usize = 7;

const MISSING_DATE_LABEL: &str = "--/--";

/// Report service trait
#[async_trait]
pub trait ReportService: Send + Sync {
    async fn financial(&self) -> Result<FinancialReport, ReportError>;
}

/// One bar of the revenue chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Finish date as `dd/mm`
    pub label: String,
    pub value: Decimal,
}

/// Totals over all completed jobs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    pub revenue: Decimal,
    pub product_cost: Decimal,
    pub labor_cost: Decimal,
    pub profit: Decimal,
    pub job_count: usize,
    pub average_ticket: Decimal,
    pub chart: Vec<ChartPoint>,
}

impl FinancialReport {
    /// Aggregate completed jobs given in registration order.
    pub fn from_jobs(jobs: &[WashJob]) -> Self {
        let revenue: Decimal = jobs.iter().map(|j| j.total_amount).sum();
        let product_cost: Decimal = jobs.iter().map(|j| j.product_cost).sum();
        let labor_cost: Decimal = jobs.iter().map(|j| j.labor_cost).sum();
        let profit: Decimal = jobs.iter().map(|j| j.profit).sum();

        let average_ticket = if jobs.is_empty() {
            Decimal::ZERO
        } else {
            PricingService::round_money(revenue / Decimal::from(jobs.len()))
        };

        let chart = jobs
            .iter()
            .skip(jobs.len().saturating_sub(CHART_SIZE))
            .map(|j| ChartPoint {
                label: j
                    .finished_at
                    .map(|at| at.format("%d/%m").to_string())
                    .unwrap_or_else(|| MISSING_DATE_LABEL.to_string()),
                value: j.total_amount,
            })
            .collect();

        Self {
            revenue,
            product_cost,
            labor_cost,
            profit,
            job_count: jobs.len(),
            average_ticket,
            chart,
        }
    }
}

/// Report service errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Repository(e) => e,
        }
    }
}

/// ReportService implementation
pub struct ReportServiceImpl<J>
where
    J: WashJobRepository,
{
    wash_job_repo: Arc<J>,
}

impl<J> ReportServiceImpl<J>
where
    J: WashJobRepository,
{
    pub fn new(wash_job_repo: Arc<J>) -> Self {
        Self { wash_job_repo }
    }
}

#[async_trait]
impl<J> ReportService for ReportServiceImpl<J>
where
    J: WashJobRepository + 'static,
{
    async fn financial(&self) -> Result<FinancialReport, ReportError> {
        let jobs = self.wash_job_repo.find_completed().await?;
        Ok(FinancialReport::from_jobs(&jobs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockWashJobRepository, WashStatus};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn completed(id: i64, day: u32, charged: Decimal, products: Decimal, labor: Decimal) -> WashJob {
        let started = Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap();
        let mut job = WashJob::start(1, 1, Decimal::ZERO, charged, None);
        job.id = id;
        job.status = WashStatus::Completed;
        job.started_at = started;
        job.finished_at = Some(started + chrono::Duration::hours(1));
        job.product_cost = products;
        job.labor_cost = labor;
        job.profit = charged - (products + labor);
        job
    }

    #[test]
    fn test_empty_report() {
        let report = FinancialReport::from_jobs(&[]);

        assert_eq!(report.revenue, Decimal::ZERO);
        assert_eq!(report.job_count, 0);
        assert_eq!(report.average_ticket, Decimal::ZERO);
        assert!(report.chart.is_empty());
    }

    #[test]
    fn test_totals_and_average() {
        let jobs = vec![
            completed(1, 1, dec!(50), dec!(2), dec!(10)),
            completed(2, 2, dec!(40), dec!(1.5), dec!(20)),
            completed(3, 3, dec!(45), dec!(0), dec!(0)),
        ];

        let report = FinancialReport::from_jobs(&jobs);

        assert_eq!(report.revenue, dec!(135));
        assert_eq!(report.product_cost, dec!(3.5));
        assert_eq!(report.labor_cost, dec!(30));
        assert_eq!(report.profit, dec!(101.5));
        assert_eq!(report.profit, report.revenue - (report.product_cost + report.labor_cost));
        assert_eq!(report.job_count, 3);
        assert_eq!(report.average_ticket, dec!(45.00));
    }

    #[test]
    fn test_average_ticket_rounds_to_cents() {
        let jobs = vec![
            completed(1, 1, dec!(10), dec!(0), dec!(0)),
            completed(2, 2, dec!(10), dec!(0), dec!(0)),
            completed(3, 3, dec!(0.01), dec!(0), dec!(0)),
        ];

        assert_eq!(FinancialReport::from_jobs(&jobs).average_ticket, dec!(6.67));
    }

    #[test]
    fn test_chart_keeps_last_seven() {
        let jobs: Vec<WashJob> = (1..=9)
            .map(|day| completed(day as i64, day, Decimal::from(day * 10), dec!(0), dec!(0)))
            .collect();

        let chart = FinancialReport::from_jobs(&jobs).chart;

        assert_eq!(chart.len(), CHART_SIZE);
        assert_eq!(chart[0], ChartPoint { label: "03/03".into(), value: dec!(30) });
        assert_eq!(chart[6], ChartPoint { label: "09/03".into(), value: dec!(90) });
    }

    #[test]
    fn test_chart_label_without_finish_date() {
        let mut job = completed(1, 1, dec!(20), dec!(0), dec!(0));
        job.finished_at = None;

        let chart = FinancialReport::from_jobs(&[job]).chart;

        assert_eq!(chart[0].label, MISSING_DATE_LABEL);
    }

    #[tokio::test]
    async fn test_financial_reads_completed_jobs() {
        let mut repo = MockWashJobRepository::new();
        repo.expect_find_completed()
            .times(1)
            .returning(|| Ok(vec![completed(1, 5, dec!(70), dec!(5), dec!(15))]));

        let report = ReportServiceImpl::new(Arc::new(repo)).financial().await.unwrap();

        assert_eq!(report.revenue, dec!(70));
        assert_eq!(report.profit, dec!(50));
        assert_eq!(report.chart[0].label, "05/03");
    }
}
