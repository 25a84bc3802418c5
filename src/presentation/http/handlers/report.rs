//! Report Handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::services::{FinancialReport, ReportService, ReportServiceImpl};
use crate::infrastructure::repositories::PgWashJobRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Financial totals over completed jobs
pub async fn financial_report(State(state): State<AppState>) -> Result<Json<FinancialReport>, AppError> {
    let service = ReportServiceImpl::new(Arc::new(PgWashJobRepository::new(state.db.clone())));

    Ok(Json(service.financial().await?))
}
