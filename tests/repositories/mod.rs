//! Repository tests against a real PostgreSQL database
//!
//! Each test gets a fresh database with the migrations applied. They are
//! ignored by default; run them with `DATABASE_URL` set:
//!
//! ```text
//! cargo test -- --ignored
//! ```

mod customer_repository_tests;
mod vehicle_repository_tests;
mod wash_job_repository_tests;

use sqlx::PgPool;

use carwash_server::domain::{
    Customer, CustomerRepository, Vehicle, VehicleCategory, VehicleRepository, WashJob,
    WashJobRepository,
};
use carwash_server::infrastructure::repositories::{
    PgCustomerRepository, PgVehicleRepository, PgWashJobRepository,
};
use rust_decimal_macros::dec;

pub async fn customer(pool: &PgPool, name: &str, phone: &str) -> Customer {
    PgCustomerRepository::new(pool.clone())
        .find_or_create(&Customer::new(name, phone, None))
        .await
        .expect("Failed to insert customer")
}

pub async fn vehicle(pool: &PgPool, customer_id: i64, plate: &str) -> Vehicle {
    PgVehicleRepository::new(pool.clone())
        .create(&Vehicle::new(customer_id, "Fiat", "Uno", plate, VehicleCategory::Hatch))
        .await
        .expect("Failed to insert vehicle")
}

pub async fn service(pool: &PgPool) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO service_catalog (name, price_hatch) VALUES ('Lavagem simples', 40) RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("Failed to insert service")
}

pub async fn wash_job(pool: &PgPool, vehicle_id: i64, service_id: i64) -> WashJob {
    PgWashJobRepository::new(pool.clone())
        .create(&WashJob::start(vehicle_id, service_id, dec!(0), dec!(40), None))
        .await
        .expect("Failed to insert wash job")
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
