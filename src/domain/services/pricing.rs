//! Pricing and job costing domain service.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::entities::{Product, ServiceCatalogEntry};
use crate::domain::value_objects::VehicleCategory;

const SECONDS_PER_HOUR: i64 = 3600;

/// Domain service for the shop's pricing arithmetic.
///
/// Every function is pure. Missing data (zero volume, no rate) yields
/// zero cost rather than an error.
pub struct PricingService;

impl PricingService {
    /// Round a money amount to cents, halves away from zero.
    pub fn round_money(value: Decimal) -> Decimal {
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Category-tier base price plus the manual adjustment.
    pub fn suggested_price(
        service: &ServiceCatalogEntry,
        category: VehicleCategory,
        adjustment: Decimal,
    ) -> Decimal {
        service.price_for(category) + adjustment
    }

    /// Cost of one dose: purchase_price / total_volume * volume_per_use.
    pub fn per_use_cost(purchase_price: Decimal, total_volume: i32, volume_per_use: i32) -> Decimal {
        if total_volume <= 0 {
            return Decimal::ZERO;
        }
        purchase_price / Decimal::from(total_volume) * Decimal::from(volume_per_use)
    }

    /// Sum of per-use costs.
    pub fn products_cost<'a>(products: impl IntoIterator<Item = &'a Product>) -> Decimal {
        products.into_iter().map(Product::per_use_cost).sum()
    }

    /// Whole seconds between start and end, clamped at zero.
    pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        (end - start).num_seconds().max(0)
    }

    /// elapsed_seconds / 3600 * hourly_rate.
    pub fn labor_cost(elapsed_seconds: i64, hourly_rate: Decimal) -> Decimal {
        Decimal::from(elapsed_seconds.max(0)) / Decimal::from(SECONDS_PER_HOUR) * hourly_rate
    }

    /// charged - (product_cost + labor_cost).
    pub fn profit(charged: Decimal, product_cost: Decimal, labor_cost: Decimal) -> Decimal {
        charged - (product_cost + labor_cost)
    }

    /// "HH:MM" from whole elapsed minutes.
    pub fn format_duration(elapsed_seconds: i64) -> String {
        let minutes = elapsed_seconds.max(0) / 60;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Figures written to a wash job when it is completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WashCosting {
    pub finished_at: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub total_minutes: i32,
    pub duration: String,
    pub charged: Decimal,
    pub product_cost: Decimal,
    pub labor_cost: Decimal,
    pub profit: Decimal,
}

impl WashCosting {
    /// Cost a job that started at `started_at` and ends at `now`.
    ///
    /// The finish time never precedes the start. Costs are rounded to cents
    /// and profit is derived from the rounded figures, so the stored values
    /// always satisfy `profit = charged - (product_cost + labor_cost)`.
    pub fn compute(
        charged: Decimal,
        products: &[Product],
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
        hourly_rate: Decimal,
    ) -> Self {
        let finished_at = now.max(started_at);
        let elapsed_seconds = PricingService::elapsed_seconds(started_at, finished_at);
        let charged = PricingService::round_money(charged);
        let product_cost = PricingService::round_money(PricingService::products_cost(products));
        let labor_cost =
            PricingService::round_money(PricingService::labor_cost(elapsed_seconds, hourly_rate));

        Self {
            finished_at,
            elapsed_seconds,
            total_minutes: i32::try_from(elapsed_seconds / 60).unwrap_or(i32::MAX),
            duration: PricingService::format_duration(elapsed_seconds),
            charged,
            product_cost,
            labor_cost,
            profit: PricingService::profit(charged, product_cost, labor_cost),
        }
    }
}
