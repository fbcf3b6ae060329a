#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use driver_incentive_backend::{
    AppState,
    entities::{driver_sponsor, drivers, sponsors},
    models::alert::AlertType,
    models::enrollment::LinkStatus,
    models::order::{CartItem, ProductId},
    routes::router,
    services::notifier::{DbNotifier, Notifier},
    services::points_ledger::PointsLedger,
};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    Set,
};

pub const SPONSOR_USER_ID: i32 = 100;
pub const DRIVER_USER_ID: i32 = 200;
pub const ADMIN_USER_ID: i32 = 1;

/// Set up an in-memory SQLite database with the full schema.
/// One pooled connection: every in-memory connection is a separate database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Connect to `TEST_DATABASE_URL` with a multi-connection pool, if configured.
/// Row locks are only exercised here; SQLite drops `FOR UPDATE`.
pub async fn setup_postgres_db() -> Option<DatabaseConnection> {
    let database_url = env::var("TEST_DATABASE_URL").ok()?;
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(10).sqlx_logging(false);
    let db = Database::connect(options).await.expect("postgres test database");
    Migrator::up(&db, None).await.expect("migrations");
    Some(db)
}

pub async fn seed_sponsor(db: &DatabaseConnection, user_id: i32, name: &str) -> sponsors::Model {
    sponsors::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_driver(db: &DatabaseConnection, user_id: i32) -> drivers::Model {
    drivers::ActiveModel {
        user_id: Set(user_id),
        first_name: Set("Test".to_string()),
        last_name: Set(format!("Driver{}", user_id)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_link(
    db: &DatabaseConnection,
    driver_id: i32,
    sponsor_id: i32,
    balance: i64,
    status: LinkStatus,
) -> driver_sponsor::Model {
    let now = Utc::now().fixed_offset();
    driver_sponsor::ActiveModel {
        driver_id: Set(driver_id),
        sponsor_id: Set(sponsor_id),
        balance: Set(balance),
        status: Set(status.as_str().to_string()),
        since_at: Set((status == LinkStatus::Active).then_some(now)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// One sponsor, one driver and an ACTIVE link between them
pub struct Fixture {
    pub db: DatabaseConnection,
    pub ledger: PointsLedger,
    pub sponsor: sponsors::Model,
    pub driver: drivers::Model,
}

impl Fixture {
    pub fn driver_id(&self) -> i32 {
        self.driver.driver_id
    }

    pub fn sponsor_id(&self) -> i32 {
        self.sponsor.sponsor_id
    }

    pub fn app(&self) -> Router {
        router(AppState::new(self.db.clone(), self.ledger.clone()))
    }
}

pub async fn setup_fixture(balance: i64) -> Fixture {
    setup_fixture_with(balance, Arc::new(DbNotifier)).await
}

pub async fn setup_fixture_with(balance: i64, notifier: Arc<dyn Notifier>) -> Fixture {
    let db = setup_test_db().await.expect("test database");
    let sponsor = seed_sponsor(&db, SPONSOR_USER_ID, "Acme Freight").await;
    let driver = seed_driver(&db, DRIVER_USER_ID).await;
    seed_link(&db, driver.driver_id, sponsor.sponsor_id, balance, LinkStatus::Active).await;

    let ledger = PointsLedger::new(db.clone(), notifier);
    Fixture {
        db,
        ledger,
        sponsor,
        driver,
    }
}

pub fn cart_item(product_id: &str, unit_price: Decimal, quantity: i32) -> CartItem {
    CartItem {
        product_id: ProductId(product_id.to_string()),
        unit_price,
        quantity,
    }
}

/// Notifier whose alert store is always unavailable
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn create_alert(
        &self,
        _conn: &DatabaseTransaction,
        _user_id: i32,
        _alert_type: AlertType,
        _details: &str,
    ) -> Result<(), DbErr> {
        Err(DbErr::Custom("alert store unavailable".to_string()))
    }
}
