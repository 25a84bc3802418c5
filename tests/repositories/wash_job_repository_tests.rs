//! Wash job repository tests

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use carwash_server::domain::{
    ChecklistUpdate, JobCompletion, WashJob, WashJobRepository, WashStatus,
};
use carwash_server::infrastructure::repositories::PgWashJobRepository;

use super::{customer, service, vehicle, wash_job};

async fn open_job(pool: &PgPool) -> WashJob {
    let service_id = service(pool).await;
    let owner = customer(pool, "Fábio", "11955550000").await;
    let car = vehicle(pool, owner.id, "GGG7G77").await;
    wash_job(pool, car.id, service_id).await
}

fn completion(job: &WashJob, charged: rust_decimal::Decimal) -> JobCompletion {
    JobCompletion {
        finished_at: job.started_at + Duration::minutes(90),
        total_amount: charged,
        product_cost: dec!(2.00),
        labor_cost: dec!(90.00),
        profit: charged - dec!(92.00),
        total_minutes: 90,
        duration: "01:30".into(),
        products_used: Some("Shampoo".into()),
        before_photo: Some("static/uploads/deliveries/before_1_2.jpg".into()),
        outcome_photo: Some("static/uploads/deliveries/after_1_3.jpg".into()),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_complete_only_once(pool: PgPool) {
    let repo = PgWashJobRepository::new(pool.clone());
    let job = open_job(&pool).await;

    let done = repo
        .complete(job.id, &completion(&job, dec!(120)))
        .await
        .unwrap()
        .expect("in-progress job should complete");
    assert_eq!(done.status, WashStatus::Completed);
    assert_eq!(done.total_amount, dec!(120));
    assert_eq!(done.profit, dec!(28.00));
    assert_eq!(
        done.intake_photos.as_deref(),
        Some("static/uploads/deliveries/before_1_2.jpg")
    );

    let again = repo
        .complete(job.id, &completion(&job, dec!(999)))
        .await
        .unwrap();
    assert!(again.is_none());

    let stored = repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.total_amount, dec!(120));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_checklist_after_completion_keeps_costing(pool: PgPool) {
    let repo = PgWashJobRepository::new(pool.clone());
    let job = open_job(&pool).await;
    repo.complete(job.id, &completion(&job, dec!(120)))
        .await
        .unwrap()
        .expect("in-progress job should complete");

    let update = ChecklistUpdate {
        fuel: "1/4".into(),
        damage: Some("Amassado no capô".into()),
        new_photos: Some("static/uploads/checklists/damage_1_9.jpg".into()),
        ..Default::default()
    };
    let saved = repo.save_checklist(job.id, &update).await.unwrap().unwrap();

    assert_eq!(saved.status, WashStatus::Completed);
    assert_eq!(saved.total_amount, dec!(120));
    assert_eq!(saved.labor_cost, dec!(90.00));
    assert!(saved.finished_at.is_some());
    assert_eq!(saved.checklist.fuel.as_deref(), Some("1/4"));
    assert_eq!(
        saved.intake_photos.as_deref(),
        Some("static/uploads/deliveries/before_1_2.jpg,static/uploads/checklists/damage_1_9.jpg")
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_checklist_keeps_fields_left_blank(pool: PgPool) {
    let repo = PgWashJobRepository::new(pool.clone());
    let job = open_job(&pool).await;

    let first = ChecklistUpdate {
        fuel: "Cheio".into(),
        tires: Some("Calibrados".into()),
        ..Default::default()
    };
    repo.save_checklist(job.id, &first).await.unwrap();

    let second = ChecklistUpdate {
        fuel: "1/2".into(),
        valuables: Some("Carregador".into()),
        ..Default::default()
    };
    let saved = repo.save_checklist(job.id, &second).await.unwrap().unwrap();

    assert_eq!(saved.status, WashStatus::InProgress);
    assert_eq!(saved.checklist.fuel.as_deref(), Some("1/2"));
    assert_eq!(saved.checklist.tires.as_deref(), Some("Calibrados"));
    assert_eq!(saved.checklist.valuables.as_deref(), Some("Carregador"));
    assert!(saved.intake_photos.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_writes_to_missing_job(pool: PgPool) {
    let repo = PgWashJobRepository::new(pool);
    let job = WashJob {
        started_at: Utc::now(),
        ..WashJob::start(1, 1, dec!(0), dec!(40), None)
    };

    assert!(repo
        .save_checklist(404, &ChecklistUpdate::default())
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .complete(404, &completion(&job, dec!(50)))
        .await
        .unwrap()
        .is_none());
}
