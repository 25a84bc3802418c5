//! Request DTOs
//!
//! Data structures for JSON request bodies. Multipart forms (checklist and
//! completion) are collected by the HTTP extractors instead.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::application::services::{
    CreateCustomerDto, CreateFixedCostDto, CreateProductDto, CreateServiceDto, CreateVehicleDto,
    CustomerMode, RegisterCustomerVehicleDto, RegisterWashJobDto,
};

/// Create customer request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl From<CreateCustomerRequest> for CreateCustomerDto {
    fn from(req: CreateCustomerRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            email: req.email,
        }
    }
}

/// Customer and first vehicle in one request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCustomerVehicleRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub model: String,

    #[validate(length(min = 1, max = 16, message = "Plate must be 1-16 characters"))]
    pub plate: String,

    pub category: Option<String>,
}

impl From<RegisterCustomerVehicleRequest> for RegisterCustomerVehicleDto {
    fn from(req: RegisterCustomerVehicleRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            email: req.email,
            brand: req.brand,
            model: req.model,
            plate: req.plate,
            category: req.category,
        }
    }
}

/// Create vehicle request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub customer_id: i64,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub model: String,

    #[validate(length(min = 1, max = 16, message = "Plate must be 1-16 characters"))]
    pub plate: String,

    pub category: Option<String>,
}

impl From<CreateVehicleRequest> for CreateVehicleDto {
    fn from(req: CreateVehicleRequest) -> Self {
        Self {
            customer_id: req.customer_id,
            brand: req.brand,
            model: req.model,
            plate: req.plate,
            category: req.category,
        }
    }
}

/// Create product request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[serde(default)]
    pub purchase_price: Decimal,

    #[serde(default)]
    #[validate(range(min = 0, message = "Total volume must not be negative"))]
    pub total_volume: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Volume per use must not be negative"))]
    pub volume_per_use: i32,
}

impl From<CreateProductRequest> for CreateProductDto {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            purchase_price: req.purchase_price,
            total_volume: req.total_volume,
            volume_per_use: req.volume_per_use,
        }
    }
}

/// Create catalog service request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[serde(default)]
    pub price_hatch: Decimal,

    #[serde(default)]
    pub price_sedan: Decimal,

    #[serde(default)]
    pub price_suv: Decimal,

    #[serde(default)]
    pub price_pickup: Decimal,

    /// Fixed products consumed by every wash of this service
    #[serde(default)]
    pub product_ids: Vec<i64>,
}

impl From<CreateServiceRequest> for CreateServiceDto {
    fn from(req: CreateServiceRequest) -> Self {
        Self {
            name: req.name,
            price_hatch: req.price_hatch,
            price_sedan: req.price_sedan,
            price_suv: req.price_suv,
            price_pickup: req.price_pickup,
            product_ids: req.product_ids,
        }
    }
}

/// Create fixed cost request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFixedCostRequest {
    #[validate(length(min = 1, max = 120, message = "Item must be 1-120 characters"))]
    pub item: String,

    #[serde(default)]
    pub amount: Decimal,
}

impl From<CreateFixedCostRequest> for CreateFixedCostDto {
    fn from(req: CreateFixedCostRequest) -> Self {
        Self {
            item: req.item,
            amount: req.amount,
        }
    }
}

/// Update hourly rate request
#[derive(Debug, Deserialize)]
pub struct UpdateHourlyRateRequest {
    #[serde(default)]
    pub hourly_rate: Decimal,
}

/// Register wash job request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterWashJobRequest {
    /// `existing` or `new`
    #[serde(default = "default_customer_mode")]
    pub customer_mode: String,

    pub vehicle_id: Option<i64>,

    #[validate(length(max = 120, message = "Name must be at most 120 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub brand: Option<String>,
    pub model: Option<String>,

    #[validate(length(max = 16, message = "Plate must be at most 16 characters"))]
    pub plate: Option<String>,

    pub category: Option<String>,

    pub service_id: i64,

    #[serde(default)]
    pub adjustment: Decimal,

    /// Damage noted at the counter
    pub intake_notes: Option<String>,
}

fn default_customer_mode() -> String {
    "existing".to_string()
}

impl RegisterWashJobRequest {
    fn mode(&self) -> CustomerMode {
        match self.customer_mode.trim().to_lowercase().as_str() {
            "new" | "novo" => CustomerMode::New,
            _ => CustomerMode::Existing,
        }
    }
}

impl From<RegisterWashJobRequest> for RegisterWashJobDto {
    fn from(req: RegisterWashJobRequest) -> Self {
        Self {
            customer_mode: req.mode(),
            vehicle_id: req.vehicle_id,
            name: req.name,
            phone: req.phone,
            email: req.email,
            brand: req.brand,
            model: req.model,
            plate: req.plate,
            category: req.category,
            service_id: req.service_id,
            adjustment: req.adjustment,
            intake_notes: req.intake_notes,
        }
    }
}
