//! Wash Job Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::application::dto::request::RegisterWashJobRequest;
use crate::application::dto::response::{
    DashboardResponse, QuoteResponse, WashJobDetailsResponse, WashJobResponse,
};
use crate::application::services::{
    ChecklistInput, CompletionInput, WashJobService, WashJobServiceImpl,
};
use crate::infrastructure::receipt::ReceiptRenderer;
use crate::infrastructure::repositories::{
    PgCustomerRepository, PgProductRepository, PgServiceCatalogRepository, PgSettingsRepository,
    PgVehicleRepository, PgWashJobRepository,
};
use crate::infrastructure::storage::LocalPhotoStorage;
use crate::presentation::http::extractors::{parse_id, MultipartForm};
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

type WashJobs = WashJobServiceImpl<
    PgWashJobRepository,
    PgVehicleRepository,
    PgCustomerRepository,
    PgServiceCatalogRepository,
    PgProductRepository,
    PgSettingsRepository,
    LocalPhotoStorage,
>;

fn wash_job_service(state: &AppState) -> WashJobs {
    WashJobServiceImpl::new(
        Arc::new(PgWashJobRepository::new(state.db.clone())),
        Arc::new(PgVehicleRepository::new(state.db.clone())),
        Arc::new(PgCustomerRepository::new(state.db.clone())),
        Arc::new(PgServiceCatalogRepository::new(state.db.clone())),
        Arc::new(PgProductRepository::new(state.db.clone())),
        Arc::new(PgSettingsRepository::new(state.db.clone())),
        state.photos.clone(),
    )
}

/// Register a wash job
pub async fn register_wash_job(
    State(state): State<AppState>,
    Json(body): Json<RegisterWashJobRequest>,
) -> Result<(StatusCode, Json<WashJobResponse>), AppError> {
    validate(&body)?;

    let view = wash_job_service(&state).register(body.into()).await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

/// All wash jobs, newest first
pub async fn list_wash_jobs(State(state): State<AppState>) -> Result<Json<Vec<WashJobResponse>>, AppError> {
    let jobs = wash_job_service(&state).list().await?;
    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

/// Jobs, products and recent customers
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = wash_job_service(&state).dashboard().await?;
    Ok(Json(dashboard.into()))
}

pub async fn get_wash_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<WashJobDetailsResponse>, AppError> {
    let job_id = parse_id(&job_id, "wash job")?;

    let details = wash_job_service(&state).details(job_id).await?;

    Ok(Json(details.into()))
}

/// Save the intake checklist (multipart)
pub async fn save_checklist(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    mut form: MultipartForm,
) -> Result<Json<WashJobResponse>, AppError> {
    let job_id = parse_id(&job_id, "wash job")?;

    let input = ChecklistInput {
        fuel: form.text("fuel"),
        damage: form.text("damage"),
        tires: form.text("tires"),
        valuables: form.text("valuables"),
        photos: form.files("photos"),
    };
    let view = wash_job_service(&state).save_checklist(job_id, input).await?;

    Ok(Json(view.into()))
}

/// Figures for the completion screen
pub async fn quote(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<QuoteResponse>, AppError> {
    let job_id = parse_id(&job_id, "wash job")?;

    let quote = wash_job_service(&state).quote(job_id, Utc::now()).await?;

    Ok(Json(quote.into()))
}

/// Complete a wash job (multipart)
pub async fn complete_wash_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    mut form: MultipartForm,
) -> Result<Json<WashJobResponse>, AppError> {
    let job_id = parse_id(&job_id, "wash job")?;

    let input = CompletionInput {
        charged_amount: form.decimal("charged_amount")?,
        product_ids: form.ids("product_ids")?,
        photo_before: form.file("photo_before"),
        photo_after: form.file("photo_after"),
    };
    let view = wash_job_service(&state)
        .complete(job_id, input, Utc::now())
        .await?;

    Ok(Json(view.into()))
}

/// Receipt PDF
pub async fn receipt(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Response, AppError> {
    let job_id = parse_id(&job_id, "wash job")?;
    let settings = state.settings.receipt.clone();

    let data = wash_job_service(&state)
        .receipt(job_id, &settings, Utc::now())
        .await?;

    // Image decoding and PDF layout are CPU bound
    let pdf = tokio::task::spawn_blocking(move || ReceiptRenderer::new(settings).render(&data))
        .await
        .map_err(|e| AppError::Internal(format!("Receipt task failed: {}", e)))??;

    tracing::info!(job_id, bytes = pdf.len(), "Receipt rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=receipt_{}.pdf", job_id),
            ),
        ],
        pdf,
    )
        .into_response())
}

pub async fn delete_wash_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let job_id = parse_id(&job_id, "wash job")?;

    wash_job_service(&state).delete(job_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
