//! Response DTOs
//!
//! Data structures for API response bodies. Money is serialized as decimal
//! strings ("45.00").

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::services::{
    CustomerProfile, Dashboard, ManagementOverview, Quote, WashJobDetails,
};
use crate::domain::{
    CascadeSummary, Customer, CustomerVisit, Product, ServiceCatalogEntry, VehicleWithOwner,
    WashJobView,
};

/// Customer with visit tracking
#[derive(Debug, Serialize)]
pub struct CustomerVisitResponse {
    #[serde(flatten)]
    pub customer: Customer,
    pub last_visit: Option<String>,
    /// Whole days since the last completed wash
    pub days_absent: Option<i64>,
}

impl CustomerVisitResponse {
    pub fn from_visit(visit: CustomerVisit, now: DateTime<Utc>) -> Self {
        Self {
            days_absent: visit.days_absent(now),
            last_visit: visit.last_visit.map(|at| at.to_rfc3339()),
            customer: visit.customer,
        }
    }
}

/// Vehicle with its owner
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub customer_id: i64,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub category: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub created_at: String,
}

impl From<VehicleWithOwner> for VehicleResponse {
    fn from(row: VehicleWithOwner) -> Self {
        let vehicle = row.vehicle;
        Self {
            id: vehicle.id,
            customer_id: vehicle.customer_id,
            brand: vehicle.brand,
            model: vehicle.model,
            plate: vehicle.plate,
            category: vehicle.category.as_str().to_string(),
            owner_name: row.owner_name,
            owner_phone: row.owner_phone,
            created_at: vehicle.created_at.to_rfc3339(),
        }
    }
}

/// Product with its dose cost
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub per_use_cost: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            per_use_cost: product.per_use_cost().round_dp(4),
            product,
        }
    }
}

/// Wash job joined with vehicle, customer and service
#[derive(Debug, Serialize)]
pub struct WashJobResponse {
    pub id: i64,
    pub status: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub vehicle_id: i64,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub category: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: Option<i64>,
    pub service_name: Option<String>,
    pub adjustment: Decimal,
    pub total_amount: Decimal,
    pub product_cost: Decimal,
    pub labor_cost: Decimal,
    pub profit: Decimal,
    pub total_minutes: i32,
    pub duration: Option<String>,
    pub products_used: Option<String>,
    pub checklist_damage: Option<String>,
    pub checklist_fuel: Option<String>,
    pub checklist_tires: Option<String>,
    pub checklist_valuables: Option<String>,
    pub intake_photos: Vec<String>,
    pub outcome_photo: Option<String>,
}

impl From<WashJobView> for WashJobResponse {
    fn from(view: WashJobView) -> Self {
        let job = view.job;
        let intake_photos = job.intake_photo_paths().iter().map(String::from).collect();
        Self {
            id: job.id,
            status: job.status.as_str().to_string(),
            started_at: job.started_at.to_rfc3339(),
            finished_at: job.finished_at.map(|at| at.to_rfc3339()),
            vehicle_id: job.vehicle_id,
            plate: view.plate,
            brand: view.brand,
            model: view.model,
            category: view.category.as_str().to_string(),
            customer_id: view.customer_id,
            customer_name: view.customer_name,
            customer_phone: view.customer_phone,
            service_id: job.service_id,
            service_name: view.service_name,
            adjustment: job.adjustment,
            total_amount: job.total_amount,
            product_cost: job.product_cost,
            labor_cost: job.labor_cost,
            profit: job.profit,
            total_minutes: job.total_minutes,
            duration: job.duration,
            products_used: job.products_used,
            checklist_damage: job.checklist.damage,
            checklist_fuel: job.checklist.fuel,
            checklist_tires: job.checklist.tires,
            checklist_valuables: job.checklist.valuables,
            intake_photos,
            outcome_photo: job.outcome_photo,
        }
    }
}

/// Wash job details with split intake photos
#[derive(Debug, Serialize)]
pub struct WashJobDetailsResponse {
    pub wash_job: WashJobResponse,
    pub damage_photos: Vec<String>,
    pub before_photo: Option<String>,
}

impl From<WashJobDetails> for WashJobDetailsResponse {
    fn from(details: WashJobDetails) -> Self {
        Self {
            wash_job: details.view.into(),
            damage_photos: details.damage_photos,
            before_photo: details.before_photo,
        }
    }
}

/// Completion screen figures
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub job_id: i64,
    pub elapsed_minutes: i64,
    pub hourly_rate: Decimal,
    pub base_value: Decimal,
    pub labor_cost: Decimal,
    pub suggested_price: Decimal,
    pub fixed_products_cost: Decimal,
    pub fixed_product_ids: Vec<i64>,
    pub products: Vec<ProductResponse>,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            job_id: quote.job_id,
            elapsed_minutes: quote.elapsed_minutes,
            hourly_rate: quote.hourly_rate,
            base_value: quote.base_value,
            labor_cost: quote.labor_cost,
            suggested_price: quote.suggested_price,
            fixed_products_cost: quote.fixed_products_cost,
            fixed_product_ids: quote.fixed_product_ids,
            products: quote.products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Home screen
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub wash_jobs: Vec<WashJobResponse>,
    pub products: Vec<ProductResponse>,
    pub recent_customers: Vec<Customer>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            wash_jobs: dashboard.wash_jobs.into_iter().map(Into::into).collect(),
            products: dashboard.products.into_iter().map(Into::into).collect(),
            recent_customers: dashboard.recent_customers,
        }
    }
}

/// Customer page
#[derive(Debug, Serialize)]
pub struct CustomerProfileResponse {
    pub customer: Customer,
    pub vehicles: Vec<crate::domain::Vehicle>,
    pub wash_jobs: Vec<WashJobResponse>,
    pub total_paid: Decimal,
}

impl From<CustomerProfile> for CustomerProfileResponse {
    fn from(profile: CustomerProfile) -> Self {
        Self {
            customer: profile.customer,
            vehicles: profile.vehicles,
            wash_jobs: profile.wash_jobs.into_iter().map(Into::into).collect(),
            total_paid: profile.total_paid,
        }
    }
}

/// Management page
#[derive(Debug, Serialize)]
pub struct ManagementResponse {
    pub products: Vec<ProductResponse>,
    pub services: Vec<ServiceCatalogEntry>,
    pub fixed_costs: Vec<crate::domain::FixedCost>,
    pub fixed_costs_total: Decimal,
    pub hourly_rate: Decimal,
}

impl From<ManagementOverview> for ManagementResponse {
    fn from(overview: ManagementOverview) -> Self {
        Self {
            products: overview.products.into_iter().map(Into::into).collect(),
            services: overview.services,
            fixed_costs: overview.fixed_costs,
            fixed_costs_total: overview.fixed_costs_total,
            hourly_rate: overview.settings.hourly_rate,
        }
    }
}

/// Rows removed by a cascading customer delete
#[derive(Debug, Serialize)]
pub struct CascadeDeleteResponse {
    pub deleted: bool,
    pub vehicles: u64,
    pub wash_jobs: u64,
}

impl From<CascadeSummary> for CascadeDeleteResponse {
    fn from(summary: CascadeSummary) -> Self {
        Self {
            deleted: true,
            vehicles: summary.vehicles,
            wash_jobs: summary.wash_jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{VehicleCategory, WashJob};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn view() -> WashJobView {
        let mut job = WashJob::start(3, 1, dec!(5), dec!(45), None);
        job.id = 8;
        job.intake_photos = Some("static/uploads/checklists/a.jpg,static/uploads/checklists/b.jpg".into());
        WashJobView {
            job,
            plate: "ABC1234".into(),
            brand: "Fiat".into(),
            model: "Uno".into(),
            category: VehicleCategory::Hatch,
            customer_id: 2,
            customer_name: "Ana".into(),
            customer_phone: "1199".into(),
            service_name: None,
        }
    }

    #[test]
    fn test_wash_job_response_serializes_money_as_strings() {
        let json = serde_json::to_value(WashJobResponse::from(view())).unwrap();

        assert_eq!(json["id"], 8);
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["total_amount"], "45");
        assert_eq!(json["category"], "hatch");
        assert_eq!(json["intake_photos"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_product_response_includes_dose_cost() {
        let product = Product::new("Shampoo", dec!(30), 1000, 50);
        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();

        assert_eq!(json["name"], "Shampoo");
        let cost: Decimal = json["per_use_cost"].as_str().unwrap().parse().unwrap();
        assert_eq!(cost, dec!(1.5));
    }

    #[test]
    fn test_customer_visit_days_absent() {
        let now = Utc::now();
        let visit = CustomerVisit {
            customer: Customer::new("Ana", "1199", None),
            last_visit: Some(now - Duration::days(12)),
        };

        let response = CustomerVisitResponse::from_visit(visit, now);

        assert_eq!(response.days_absent, Some(12));
        assert_eq!(response.customer.phone, "1199");
    }
}
