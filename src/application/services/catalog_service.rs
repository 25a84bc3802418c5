//! Catalog Service
//!
//! Back-office management: consumable products, the service catalog,
//! fixed costs and the hourly labor rate.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::services::PricingService;
use crate::domain::{
    FixedCost, FixedCostRepository, Product, ProductRepository, ServiceCatalogEntry,
    ServiceCatalogRepository, SettingsRepository, ShopSettings,
};
use crate::shared::error::AppError;

/// Catalog service trait
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Everything shown on the management page
    async fn overview(&self) -> Result<ManagementOverview, CatalogError>;

    async fn create_product(&self, dto: CreateProductDto) -> Result<Product, CatalogError>;
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;
    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogError>;

    /// Unknown fixed product IDs are dropped
    async fn create_service(&self, dto: CreateServiceDto) -> Result<ServiceCatalogEntry, CatalogError>;
    async fn list_services(&self) -> Result<Vec<ServiceCatalogEntry>, CatalogError>;
    async fn delete_service(&self, service_id: i64) -> Result<(), CatalogError>;

    async fn create_fixed_cost(&self, dto: CreateFixedCostDto) -> Result<FixedCost, CatalogError>;
    async fn list_fixed_costs(&self) -> Result<Vec<FixedCost>, CatalogError>;
    async fn delete_fixed_cost(&self, fixed_cost_id: i64) -> Result<(), CatalogError>;

    async fn get_settings(&self) -> Result<ShopSettings, CatalogError>;
    async fn set_hourly_rate(&self, hourly_rate: Decimal) -> Result<ShopSettings, CatalogError>;
}

/// Create product input
#[derive(Debug, Clone)]
pub struct CreateProductDto {
    pub name: String,
    pub purchase_price: Decimal,
    pub total_volume: i32,
    pub volume_per_use: i32,
}

/// Create service input
#[derive(Debug, Clone, Default)]
pub struct CreateServiceDto {
    pub name: String,
    pub price_hatch: Decimal,
    pub price_sedan: Decimal,
    pub price_suv: Decimal,
    pub price_pickup: Decimal,
    pub product_ids: Vec<i64>,
}

/// Create fixed cost input
#[derive(Debug, Clone)]
pub struct CreateFixedCostDto {
    pub item: String,
    pub amount: Decimal,
}

/// Management page contents
#[derive(Debug, Clone, PartialEq)]
pub struct ManagementOverview {
    pub products: Vec<Product>,
    pub services: Vec<ServiceCatalogEntry>,
    pub fixed_costs: Vec<FixedCost>,
    pub settings: ShopSettings,
    /// Informational monthly total of fixed costs
    pub fixed_costs_total: Decimal,
}

/// Catalog service errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} with id {1} not found")]
    NotFound(&'static str, i64),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound(..) => AppError::NotFound(message),
            CatalogError::Invalid(_) => AppError::BadRequest(message),
            CatalogError::Repository(e) => e,
        }
    }
}

fn not_found(entity: &'static str, id: i64) -> impl FnOnce(AppError) -> CatalogError {
    move |e| match e {
        AppError::NotFound(_) => CatalogError::NotFound(entity, id),
        e => CatalogError::Repository(e),
    }
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), CatalogError> {
    if value < Decimal::ZERO {
        return Err(CatalogError::Invalid(format!("{} must not be negative", field)));
    }
    Ok(())
}

/// CatalogService implementation
pub struct CatalogServiceImpl<P, K, F, S>
where
    P: ProductRepository,
    K: ServiceCatalogRepository,
    F: FixedCostRepository,
    S: SettingsRepository,
{
    product_repo: Arc<P>,
    catalog_repo: Arc<K>,
    fixed_cost_repo: Arc<F>,
    settings_repo: Arc<S>,
}

impl<P, K, F, S> CatalogServiceImpl<P, K, F, S>
where
    P: ProductRepository,
    K: ServiceCatalogRepository,
    F: FixedCostRepository,
    S: SettingsRepository,
{
    pub fn new(
        product_repo: Arc<P>,
        catalog_repo: Arc<K>,
        fixed_cost_repo: Arc<F>,
        settings_repo: Arc<S>,
    ) -> Self {
        Self {
            product_repo,
            catalog_repo,
            fixed_cost_repo,
            settings_repo,
        }
    }
}

#[async_trait]
impl<P, K, F, S> CatalogService for CatalogServiceImpl<P, K, F, S>
where
    P: ProductRepository + 'static,
    K: ServiceCatalogRepository + 'static,
    F: FixedCostRepository + 'static,
    S: SettingsRepository + 'static,
{
    async fn overview(&self) -> Result<ManagementOverview, CatalogError> {
        let products = self.product_repo.find_all().await?;
        let services = self.catalog_repo.find_all().await?;
        let fixed_costs = self.fixed_cost_repo.find_all().await?;
        let settings = self.settings_repo.get().await?;
        let fixed_costs_total = fixed_costs.iter().map(|c| c.amount).sum();

        Ok(ManagementOverview {
            products,
            services,
            fixed_costs,
            settings,
            fixed_costs_total,
        })
    }

    async fn create_product(&self, dto: CreateProductDto) -> Result<Product, CatalogError> {
        require_non_negative("purchase_price", dto.purchase_price)?;
        if dto.total_volume < 0 || dto.volume_per_use < 0 {
            return Err(CatalogError::Invalid("Volumes must not be negative".into()));
        }

        let product = Product::new(
            dto.name,
            PricingService::round_money(dto.purchase_price),
            dto.total_volume,
            dto.volume_per_use,
        );
        let product = self.product_repo.create(&product).await?;
        info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.product_repo.find_all().await?)
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogError> {
        self.product_repo
            .delete(product_id)
            .await
            .map_err(not_found("Product", product_id))
    }

    async fn create_service(&self, dto: CreateServiceDto) -> Result<ServiceCatalogEntry, CatalogError> {
        for (field, price) in [
            ("price_hatch", dto.price_hatch),
            ("price_sedan", dto.price_sedan),
            ("price_suv", dto.price_suv),
            ("price_pickup", dto.price_pickup),
        ] {
            require_non_negative(field, price)?;
        }

        let mut product_ids = dto.product_ids;
        product_ids.sort_unstable();
        product_ids.dedup();

        let entry = ServiceCatalogEntry {
            name: dto.name.trim().to_string(),
            price_hatch: PricingService::round_money(dto.price_hatch),
            price_sedan: PricingService::round_money(dto.price_sedan),
            price_suv: PricingService::round_money(dto.price_suv),
            price_pickup: PricingService::round_money(dto.price_pickup),
            product_ids,
            ..Default::default()
        };
        let entry = self.catalog_repo.create(&entry).await?;
        info!(service_id = entry.id, name = %entry.name, products = entry.product_ids.len(), "Service created");
        Ok(entry)
    }

    async fn list_services(&self) -> Result<Vec<ServiceCatalogEntry>, CatalogError> {
        Ok(self.catalog_repo.find_all().await?)
    }

    async fn delete_service(&self, service_id: i64) -> Result<(), CatalogError> {
        self.catalog_repo
            .delete(service_id)
            .await
            .map_err(not_found("Service", service_id))
    }

    async fn create_fixed_cost(&self, dto: CreateFixedCostDto) -> Result<FixedCost, CatalogError> {
        require_non_negative("amount", dto.amount)?;
        let cost = FixedCost::new(dto.item, PricingService::round_money(dto.amount));
        Ok(self.fixed_cost_repo.create(&cost).await?)
    }

    async fn list_fixed_costs(&self) -> Result<Vec<FixedCost>, CatalogError> {
        Ok(self.fixed_cost_repo.find_all().await?)
    }

    async fn delete_fixed_cost(&self, fixed_cost_id: i64) -> Result<(), CatalogError> {
        self.fixed_cost_repo
            .delete(fixed_cost_id)
            .await
            .map_err(not_found("Fixed cost", fixed_cost_id))
    }

    async fn get_settings(&self) -> Result<ShopSettings, CatalogError> {
        Ok(self.settings_repo.get().await?)
    }

    async fn set_hourly_rate(&self, hourly_rate: Decimal) -> Result<ShopSettings, CatalogError> {
        require_non_negative("hourly_rate", hourly_rate)?;
        let settings = self
            .settings_repo
            .set_hourly_rate(PricingService::round_money(hourly_rate))
            .await?;
        info!(hourly_rate = %settings.hourly_rate, "Hourly rate updated");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MockFixedCostRepository, MockProductRepository, MockServiceCatalogRepository,
        MockSettingsRepository,
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    type TestService = CatalogServiceImpl<
        MockProductRepository,
        MockServiceCatalogRepository,
        MockFixedCostRepository,
        MockSettingsRepository,
    >;

    struct Mocks {
        products: MockProductRepository,
        catalog: MockServiceCatalogRepository,
        fixed_costs: MockFixedCostRepository,
        settings: MockSettingsRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                products: MockProductRepository::new(),
                catalog: MockServiceCatalogRepository::new(),
                fixed_costs: MockFixedCostRepository::new(),
                settings: MockSettingsRepository::new(),
            }
        }

        fn build(self) -> TestService {
            CatalogServiceImpl::new(
                Arc::new(self.products),
                Arc::new(self.catalog),
                Arc::new(self.fixed_costs),
                Arc::new(self.settings),
            )
        }
    }

    #[tokio::test]
    async fn test_create_service_dedups_product_ids() {
        let mut mocks = Mocks::new();
        mocks
            .catalog
            .expect_create()
            .withf(|e| e.product_ids == vec![1, 4] && e.price_pickup == Decimal::ZERO)
            .returning(|e| {
                Ok(ServiceCatalogEntry {
                    id: 9,
                    product_ids: vec![1],
                    ..e.clone()
                })
            });

        let entry = mocks
            .build()
            .create_service(CreateServiceDto {
                name: " Lavagem completa ".into(),
                price_hatch: dec!(40),
                price_sedan: dec!(45),
                price_suv: dec!(50),
                product_ids: vec![4, 1, 4],
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(entry.id, 9);
        assert_eq!(entry.name, "Lavagem completa");
        assert_eq!(entry.product_ids, vec![1]);
    }

    #[tokio::test]
    async fn test_create_service_rejects_negative_price() {
        let result = Mocks::new()
            .build()
            .create_service(CreateServiceDto {
                name: "Polimento".into(),
                price_suv: dec!(-1),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_set_hourly_rate_rounds_to_cents() {
        let mut mocks = Mocks::new();
        mocks
            .settings
            .expect_set_hourly_rate()
            .with(eq(dec!(37.51)))
            .times(1)
            .returning(|rate| {
                Ok(ShopSettings {
                    hourly_rate: rate,
                    updated_at: Some(Utc::now()),
                })
            });

        let settings = mocks.build().set_hourly_rate(dec!(37.505)).await.unwrap();

        assert_eq!(settings.hourly_rate, dec!(37.51));
    }

    #[tokio::test]
    async fn test_overview_totals_fixed_costs() {
        let mut mocks = Mocks::new();
        mocks.products.expect_find_all().returning(|| Ok(vec![]));
        mocks.catalog.expect_find_all().returning(|| Ok(vec![]));
        mocks.fixed_costs.expect_find_all().returning(|| {
            Ok(vec![
                FixedCost::new("Aluguel", dec!(1500)),
                FixedCost::new("Água", dec!(230.40)),
            ])
        });
        mocks
            .settings
            .expect_get()
            .returning(|| Ok(ShopSettings::default()));

        let overview = mocks.build().overview().await.unwrap();

        assert_eq!(overview.fixed_costs_total, dec!(1730.40));
        assert_eq!(overview.settings.hourly_rate, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mocks = Mocks::new();
        mocks
            .products
            .expect_delete()
            .returning(|_| Err(AppError::NotFound("gone".into())));

        let err: AppError = mocks.build().delete_product(5).await.unwrap_err().into();

        match err {
            AppError::NotFound(message) => assert_eq!(message, "Product with id 5 not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_volume() {
        let result = Mocks::new()
            .build()
            .create_product(CreateProductDto {
                name: "Cera".into(),
                purchase_price: dec!(80),
                total_volume: -1,
                volume_per_use: 30,
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Invalid(_))));
    }
}
