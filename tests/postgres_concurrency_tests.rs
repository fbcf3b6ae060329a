//! Runs only when TEST_DATABASE_URL points at a Postgres database

mod common;

use std::sync::Arc;

use common::{seed_driver, seed_link, seed_sponsor, setup_postgres_db};
use driver_incentive_backend::{
    models::enrollment::LinkStatus, models::points::Points, services::notifier::DbNotifier,
    services::points_ledger::PointsLedger,
};
use rust_decimal_macros::dec;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_parallel_awards_serialize_on_row_lock() {
    let Some(db) = setup_postgres_db().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    // Fresh user ids so reruns against the same database do not collide
    let base = rand::random::<u16>() as i32 * 10 + 1_000_000;
    let sponsor = seed_sponsor(&db, base, "Parallel Freight").await;
    let driver = seed_driver(&db, base + 1).await;
    seed_link(&db, driver.driver_id, sponsor.sponsor_id, 0, LinkStatus::Active).await;

    let ledger = PointsLedger::new(db.clone(), Arc::new(DbNotifier));
    let handles: Vec<_> = (0..50)
        .map(|i| {
            let ledger = ledger.clone();
            let (driver_id, sponsor_id) = (driver.driver_id, sponsor.sponsor_id);
            tokio::spawn(async move {
                ledger
                    .award(driver_id, sponsor_id, Points::new(10), &format!("shift {}", i), base)
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(
        ledger
            .get_balance(driver.driver_id, sponsor.sponsor_id)
            .await
            .unwrap(),
        Points::new(500)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_parallel_purchases_never_overdraw() {
    let Some(db) = setup_postgres_db().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let base = rand::random::<u16>() as i32 * 10 + 2_000_000;
    let sponsor = seed_sponsor(&db, base, "Parallel Retail").await;
    let driver = seed_driver(&db, base + 1).await;
    seed_link(&db, driver.driver_id, sponsor.sponsor_id, 1000, LinkStatus::Active).await;

    let ledger = PointsLedger::new(db.clone(), Arc::new(DbNotifier));
    let handles: Vec<_> = (0..20)
        .map(|_| {
            let ledger = ledger.clone();
            let (driver_id, sponsor_id) = (driver.driver_id, sponsor.sponsor_id);
            tokio::spawn(async move {
                ledger
                    .purchase(driver_id, sponsor_id, &[common::cart_item("sku-1", dec!(1.00), 1)])
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }

    // 1000 points cover exactly ten 100-point carts
    assert_eq!(succeeded, 10);
    assert_eq!(
        ledger
            .get_balance(driver.driver_id, sponsor.sponsor_id)
            .await
            .unwrap(),
        Points::ZERO
    );
}
