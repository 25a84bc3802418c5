//! Customer repository tests

use pretty_assertions::assert_eq;
use sqlx::PgPool;

use carwash_server::domain::{Customer, CustomerRepository};
use carwash_server::infrastructure::repositories::PgCustomerRepository;
use carwash_server::shared::error::AppError;

use super::{count, customer, service, vehicle, wash_job};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_find_or_create_keeps_one_row_per_phone(pool: PgPool) {
    let repo = PgCustomerRepository::new(pool.clone());

    let first = repo
        .find_or_create(&Customer::new("Ana", " 11999990000 ", None))
        .await
        .unwrap();
    let second = repo
        .find_or_create(&Customer::new("Ana Souza", "11999990000", Some("ana@mail.com".into())))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Ana");
    assert_eq!(second.email.as_deref(), Some("ana@mail.com"));
    assert_eq!(count(&pool, "customers").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_cascade_removes_vehicles_and_jobs(pool: PgPool) {
    let service_id = service(&pool).await;
    let owner = customer(&pool, "Bruno", "11911110000").await;
    let other = customer(&pool, "Carla", "11922220000").await;

    for plate in ["AAA1A11", "BBB2B22"] {
        let car = vehicle(&pool, owner.id, plate).await;
        wash_job(&pool, car.id, service_id).await;
    }
    let kept = vehicle(&pool, other.id, "CCC3C33").await;
    wash_job(&pool, kept.id, service_id).await;

    let summary = PgCustomerRepository::new(pool.clone())
        .delete_cascade(owner.id)
        .await
        .unwrap();

    assert_eq!(summary.vehicles, 2);
    assert_eq!(summary.wash_jobs, 2);
    assert_eq!(count(&pool, "customers").await, 1);
    assert_eq!(count(&pool, "vehicles").await, 1);
    assert_eq!(count(&pool, "wash_jobs").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_cascade_of_missing_customer(pool: PgPool) {
    let result = PgCustomerRepository::new(pool).delete_cascade(404).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
