//! Vehicle repository tests

use pretty_assertions::assert_eq;
use sqlx::PgPool;

use carwash_server::domain::VehicleRepository;
use carwash_server::infrastructure::repositories::PgVehicleRepository;
use carwash_server::shared::error::AppError;

use super::{count, customer, service, vehicle, wash_job};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_removes_jobs_and_keeps_owner(pool: PgPool) {
    let service_id = service(&pool).await;
    let owner = customer(&pool, "Diego", "11933330000").await;
    let car = vehicle(&pool, owner.id, "DDD4D44").await;
    let other_car = vehicle(&pool, owner.id, "EEE5E55").await;
    wash_job(&pool, car.id, service_id).await;
    wash_job(&pool, car.id, service_id).await;
    wash_job(&pool, other_car.id, service_id).await;

    PgVehicleRepository::new(pool.clone())
        .delete(car.id)
        .await
        .unwrap();

    assert_eq!(count(&pool, "customers").await, 1);
    assert_eq!(count(&pool, "vehicles").await, 1);
    assert_eq!(count(&pool, "wash_jobs").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_plate_is_conflict(pool: PgPool) {
    let owner = customer(&pool, "Elisa", "11944440000").await;
    let car = vehicle(&pool, owner.id, "fff6f66").await;
    assert_eq!(car.plate, "FFF6F66");

    let repo = PgVehicleRepository::new(pool.clone());
    let result = repo.create(&car).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let existing = repo.find_or_create(&car).await.unwrap();
    assert_eq!(existing.id, car.id);
    assert_eq!(count(&pool, "vehicles").await, 1);
}
