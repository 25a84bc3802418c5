//! Wash Job Service
//!
//! Handles the life of a wash job: registration and pricing, the intake
//! checklist, the completion quote, completion with costing, receipts and
//! deletion.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::services::customer_service::RECENT_CUSTOMERS;
use crate::config::ReceiptSettings;
use crate::domain::services::{PhotoStorage, PhotoUpload, PricingService, WashCosting};
use crate::domain::{
    ChecklistUpdate, Customer, CustomerRepository, JobCompletion, PhotoKind, PhotoPaths, Product,
    ProductRepository, ServiceCatalogRepository, SettingsRepository, Vehicle, VehicleCategory,
    VehicleRepository, WashJob, WashJobRepository, WashJobView,
};
use crate::infrastructure::metrics;
use crate::infrastructure::receipt::ReceiptData;
use crate::shared::error::AppError;

/// Fuel level recorded when the checklist leaves it blank.
pub const DEFAULT_FUEL_LEVEL: &str = "Não informado";

/// Wash job service trait
#[async_trait]
pub trait WashJobService: Send + Sync {
    /// Register a job for an existing vehicle or a new customer and vehicle
    async fn register(&self, dto: RegisterWashJobDto) -> Result<WashJobView, WashJobError>;

    /// All jobs, newest first
    async fn list(&self) -> Result<Vec<WashJobView>, WashJobError>;

    /// Jobs, products and recent customers
    async fn dashboard(&self) -> Result<Dashboard, WashJobError>;

    /// Job with its intake photos split by purpose
    async fn details(&self, job_id: i64) -> Result<WashJobDetails, WashJobError>;

    /// Record the intake checklist and append damage photos
    async fn save_checklist(&self, job_id: i64, input: ChecklistInput) -> Result<WashJobView, WashJobError>;

    /// Figures shown on the completion screen at `now`
    async fn quote(&self, job_id: i64, now: DateTime<Utc>) -> Result<Quote, WashJobError>;

    /// Close the job at `now` and store its costing
    async fn complete(
        &self,
        job_id: i64,
        input: CompletionInput,
        now: DateTime<Utc>,
    ) -> Result<WashJobView, WashJobError>;

    /// Everything printed on the job's receipt
    async fn receipt(
        &self,
        job_id: i64,
        settings: &ReceiptSettings,
        issued_at: DateTime<Utc>,
    ) -> Result<ReceiptData, WashJobError>;

    async fn delete(&self, job_id: i64) -> Result<(), WashJobError>;
}

/// How the vehicle of a new job is identified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerMode {
    /// A vehicle already on file, by ID
    Existing,
    /// Customer and vehicle given inline, found or created
    New,
}

/// Register wash job input
#[derive(Debug, Clone)]
pub struct RegisterWashJobDto {
    pub customer_mode: CustomerMode,
    pub vehicle_id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub plate: Option<String>,
    pub category: Option<String>,
    pub service_id: i64,
    pub adjustment: Decimal,
    pub intake_notes: Option<String>,
}

/// Checklist form contents
#[derive(Debug, Clone, Default)]
pub struct ChecklistInput {
    pub fuel: Option<String>,
    pub damage: Option<String>,
    pub tires: Option<String>,
    pub valuables: Option<String>,
    pub photos: Vec<PhotoUpload>,
}

/// Completion form contents
#[derive(Debug, Clone, Default)]
pub struct CompletionInput {
    pub charged_amount: Decimal,
    /// Selected products; repeats count once per occurrence
    pub product_ids: Vec<i64>,
    pub photo_before: Option<PhotoUpload>,
    pub photo_after: Option<PhotoUpload>,
}

/// Job details with intake photos split
#[derive(Debug, Clone, PartialEq)]
pub struct WashJobDetails {
    pub view: WashJobView,
    pub damage_photos: Vec<String>,
    pub before_photo: Option<String>,
}

/// Completion screen figures
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub job_id: i64,
    pub elapsed_minutes: i64,
    pub hourly_rate: Decimal,
    /// Price stored at registration
    pub base_value: Decimal,
    pub labor_cost: Decimal,
    pub suggested_price: Decimal,
    pub fixed_products_cost: Decimal,
    pub fixed_product_ids: Vec<i64>,
    pub products: Vec<Product>,
}

/// Home screen contents
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub wash_jobs: Vec<WashJobView>,
    pub products: Vec<Product>,
    pub recent_customers: Vec<Customer>,
}

/// Wash job service errors
#[derive(Debug, thiserror::Error)]
pub enum WashJobError {
    #[error("Wash job with id {0} not found")]
    NotFound(i64),

    #[error("Vehicle with id {0} not found")]
    VehicleNotFound(i64),

    #[error("Service with id {0} not found")]
    ServiceNotFound(i64),

    #[error("Wash job {0} is already completed")]
    AlreadyCompleted(i64),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<WashJobError> for AppError {
    fn from(err: WashJobError) -> Self {
        let message = err.to_string();
        match err {
            WashJobError::NotFound(_)
            | WashJobError::VehicleNotFound(_)
            | WashJobError::ServiceNotFound(_) => AppError::NotFound(message),
            WashJobError::AlreadyCompleted(_) => AppError::Conflict(message),
            WashJobError::Invalid(_) => AppError::BadRequest(message),
            WashJobError::Repository(e) => e,
        }
    }
}

/// Trimmed text, `None` when blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, WashJobError> {
    non_blank(value).ok_or_else(|| WashJobError::Invalid(format!("{} is required for a new customer", field)))
}

/// WashJobService implementation
pub struct WashJobServiceImpl<J, V, C, K, P, S, F>
where
    J: WashJobRepository,
    V: VehicleRepository,
    C: CustomerRepository,
    K: ServiceCatalogRepository,
    P: ProductRepository,
    S: SettingsRepository,
    F: PhotoStorage,
{
    wash_job_repo: Arc<J>,
    vehicle_repo: Arc<V>,
    customer_repo: Arc<C>,
    catalog_repo: Arc<K>,
    product_repo: Arc<P>,
    settings_repo: Arc<S>,
    photos: Arc<F>,
}

impl<J, V, C, K, P, S, F> WashJobServiceImpl<J, V, C, K, P, S, F>
where
    J: WashJobRepository,
    V: VehicleRepository,
    C: CustomerRepository,
    K: ServiceCatalogRepository,
    P: ProductRepository,
    S: SettingsRepository,
    F: PhotoStorage,
{
    pub fn new(
        wash_job_repo: Arc<J>,
        vehicle_repo: Arc<V>,
        customer_repo: Arc<C>,
        catalog_repo: Arc<K>,
        product_repo: Arc<P>,
        settings_repo: Arc<S>,
        photos: Arc<F>,
    ) -> Self {
        Self {
            wash_job_repo,
            vehicle_repo,
            customer_repo,
            catalog_repo,
            product_repo,
            settings_repo,
            photos,
        }
    }

    async fn require_job(&self, job_id: i64) -> Result<WashJob, WashJobError> {
        self.wash_job_repo
            .find_by_id(job_id)
            .await?
            .ok_or(WashJobError::NotFound(job_id))
    }

    async fn require_view(&self, job_id: i64) -> Result<WashJobView, WashJobError> {
        self.wash_job_repo
            .find_view_by_id(job_id)
            .await?
            .ok_or(WashJobError::NotFound(job_id))
    }

    /// Store one upload, recording its path in `stored`. On failure the
    /// photos already in `stored` are removed.
    async fn store_photo(
        &self,
        job_id: i64,
        kind: PhotoKind,
        upload: &PhotoUpload,
        stored: &mut PhotoPaths,
    ) -> Result<String, WashJobError> {
        match self.photos.store(job_id, kind, upload).await {
            Ok(path) => {
                stored.push(path.clone());
                Ok(path)
            }
            Err(e) => {
                self.discard_photos(stored).await;
                Err(e.into())
            }
        }
    }

    async fn discard_photos(&self, stored: &PhotoPaths) {
        for path in stored.iter() {
            self.photos.discard(path).await;
        }
    }

    /// Vehicle for a new job, creating customer and vehicle when asked to.
    async fn resolve_vehicle(&self, dto: &RegisterWashJobDto) -> Result<Vehicle, WashJobError> {
        match dto.customer_mode {
            CustomerMode::Existing => {
                let vehicle_id = dto.vehicle_id.ok_or_else(|| {
                    WashJobError::Invalid("vehicle_id is required for an existing customer".into())
                })?;
                self.vehicle_repo
                    .find_by_id(vehicle_id)
                    .await?
                    .ok_or(WashJobError::VehicleNotFound(vehicle_id))
            }
            CustomerMode::New => {
                let name = required(dto.name.clone(), "name")?;
                let phone = required(dto.phone.clone(), "phone")?;
                let plate = required(dto.plate.clone(), "plate")?;

                let customer = self
                    .customer_repo
                    .find_or_create(&Customer::new(name, &phone, dto.email.clone()))
                    .await?;

                let category = VehicleCategory::parse(dto.category.as_deref().unwrap_or_default());
                let vehicle = Vehicle::new(
                    customer.id,
                    dto.brand.clone().unwrap_or_default(),
                    dto.model.clone().unwrap_or_default(),
                    &plate,
                    category,
                );
                Ok(self.vehicle_repo.find_or_create(&vehicle).await?)
            }
        }
    }
}

#[async_trait]
impl<J, V, C, K, P, S, F> WashJobService for WashJobServiceImpl<J, V, C, K, P, S, F>
where
    J: WashJobRepository + 'static,
    V: VehicleRepository + 'static,
    C: CustomerRepository + 'static,
    K: ServiceCatalogRepository + 'static,
    P: ProductRepository + 'static,
    S: SettingsRepository + 'static,
    F: PhotoStorage + 'static,
{
    async fn register(&self, dto: RegisterWashJobDto) -> Result<WashJobView, WashJobError> {
        let service = self
            .catalog_repo
            .find_by_id(dto.service_id)
            .await?
            .ok_or(WashJobError::ServiceNotFound(dto.service_id))?;
        let vehicle = self.resolve_vehicle(&dto).await?;

        let adjustment = PricingService::round_money(dto.adjustment);
        let price = PricingService::round_money(PricingService::suggested_price(
            &service,
            vehicle.category,
            adjustment,
        ));

        let job = WashJob::start(
            vehicle.id,
            service.id,
            adjustment,
            price,
            non_blank(dto.intake_notes),
        );
        let job = self.wash_job_repo.create(&job).await?;

        metrics::record_wash_job_event("registered");
        info!(
            job_id = job.id,
            vehicle_id = vehicle.id,
            plate = %vehicle.plate,
            service = %service.name,
            price = %price,
            "Wash job registered"
        );

        self.require_view(job.id).await
    }

    async fn list(&self) -> Result<Vec<WashJobView>, WashJobError> {
        Ok(self.wash_job_repo.find_all_views().await?)
    }

    async fn dashboard(&self) -> Result<Dashboard, WashJobError> {
        Ok(Dashboard {
            wash_jobs: self.wash_job_repo.find_all_views().await?,
            products: self.product_repo.find_all().await?,
            recent_customers: self.customer_repo.find_recent(RECENT_CUSTOMERS).await?,
        })
    }

    async fn details(&self, job_id: i64) -> Result<WashJobDetails, WashJobError> {
        let view = self.require_view(job_id).await?;
        let photos = view.job.intake_photo_paths();

        Ok(WashJobDetails {
            damage_photos: photos.damage_photos(),
            before_photo: photos.before_photo(),
            view,
        })
    }

    async fn save_checklist(&self, job_id: i64, input: ChecklistInput) -> Result<WashJobView, WashJobError> {
        self.require_job(job_id).await?;

        let mut stored = PhotoPaths::default();
        for upload in &input.photos {
            self.store_photo(job_id, PhotoKind::Damage, upload, &mut stored)
                .await?;
        }

        let update = ChecklistUpdate {
            fuel: non_blank(input.fuel).unwrap_or_else(|| DEFAULT_FUEL_LEVEL.to_string()),
            damage: non_blank(input.damage),
            tires: non_blank(input.tires),
            valuables: non_blank(input.valuables),
            new_photos: stored.to_column(),
        };

        match self.wash_job_repo.save_checklist(job_id, &update).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.discard_photos(&stored).await;
                return Err(WashJobError::NotFound(job_id));
            }
            Err(e) => {
                self.discard_photos(&stored).await;
                return Err(e.into());
            }
        }
        info!(job_id, photos = input.photos.len(), "Checklist saved");

        self.require_view(job_id).await
    }

    async fn quote(&self, job_id: i64, now: DateTime<Utc>) -> Result<Quote, WashJobError> {
        let job = self.require_job(job_id).await?;
        let settings = self.settings_repo.get().await?;

        let fixed_product_ids = match job.service_id {
            Some(service_id) => self
                .catalog_repo
                .find_by_id(service_id)
                .await?
                .map(|s| s.product_ids)
                .unwrap_or_default(),
            None => Vec::new(),
        };
        let fixed_products = self.product_repo.find_by_ids(&fixed_product_ids).await?;
        let products = self.product_repo.find_all().await?;

        let end = job.finished_at.unwrap_or(now);
        let elapsed = PricingService::elapsed_seconds(job.started_at, end);

        Ok(Quote {
            job_id,
            elapsed_minutes: elapsed / 60,
            hourly_rate: settings.hourly_rate,
            base_value: job.total_amount,
            labor_cost: PricingService::round_money(PricingService::labor_cost(
                elapsed,
                settings.hourly_rate,
            )),
            suggested_price: job.total_amount,
            fixed_products_cost: PricingService::round_money(PricingService::products_cost(
                &fixed_products,
            )),
            fixed_product_ids,
            products,
        })
    }

    async fn complete(
        &self,
        job_id: i64,
        input: CompletionInput,
        now: DateTime<Utc>,
    ) -> Result<WashJobView, WashJobError> {
        let job = self.require_job(job_id).await?;
        if job.is_completed() {
            return Err(WashJobError::AlreadyCompleted(job_id));
        }
        if input.charged_amount < Decimal::ZERO {
            return Err(WashJobError::Invalid("charged_amount must not be negative".into()));
        }

        let products = self.product_repo.find_by_ids(&input.product_ids).await?;
        if products.len() < input.product_ids.len() {
            warn!(job_id, requested = input.product_ids.len(), found = products.len(), "Unknown products ignored");
        }
        let settings = self.settings_repo.get().await?;
        let costing = WashCosting::compute(
            input.charged_amount,
            &products,
            job.started_at,
            now,
            settings.hourly_rate,
        );

        let mut stored = PhotoPaths::default();
        let before_photo = match &input.photo_before {
            Some(upload) => Some(
                self.store_photo(job_id, PhotoKind::Before, upload, &mut stored)
                    .await?,
            ),
            None => None,
        };
        let outcome_photo = match &input.photo_after {
            Some(upload) => Some(
                self.store_photo(job_id, PhotoKind::After, upload, &mut stored)
                    .await?,
            ),
            None => None,
        };

        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        let completion = JobCompletion {
            finished_at: costing.finished_at,
            total_amount: costing.charged,
            product_cost: costing.product_cost,
            labor_cost: costing.labor_cost,
            profit: costing.profit,
            total_minutes: costing.total_minutes,
            duration: costing.duration.clone(),
            products_used: (!names.is_empty()).then(|| names.join(", ")),
            before_photo,
            outcome_photo,
        };

        match self.wash_job_repo.complete(job_id, &completion).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.discard_photos(&stored).await;
                // Completed or deleted since it was read
                return Err(match self.wash_job_repo.find_by_id(job_id).await? {
                    Some(_) => WashJobError::AlreadyCompleted(job_id),
                    None => WashJobError::NotFound(job_id),
                });
            }
            Err(e) => {
                self.discard_photos(&stored).await;
                return Err(e.into());
            }
        }

        metrics::record_wash_job_event("completed");
        metrics::record_revenue(costing.charged.to_f64().unwrap_or_default());
        info!(
            job_id,
            charged = %costing.charged,
            product_cost = %costing.product_cost,
            labor_cost = %costing.labor_cost,
            profit = %costing.profit,
            duration = %costing.duration,
            "Wash job completed"
        );

        self.require_view(job_id).await
    }

    async fn receipt(
        &self,
        job_id: i64,
        settings: &ReceiptSettings,
        issued_at: DateTime<Utc>,
    ) -> Result<ReceiptData, WashJobError> {
        let view = self.require_view(job_id).await?;
        Ok(ReceiptData::from_view(&view, settings, issued_at, |path| {
            self.photos.resolve(path)
        }))
    }

    async fn delete(&self, job_id: i64) -> Result<(), WashJobError> {
        self.wash_job_repo
            .delete(job_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => WashJobError::NotFound(job_id),
                e => WashJobError::Repository(e),
            })?;

        metrics::record_wash_job_event("deleted");
        info!(job_id, "Wash job deleted");
        Ok(())
    }
}
