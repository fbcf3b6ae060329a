// src/lib.rs

use sea_orm::DatabaseConnection;
use services::points_ledger::PointsLedger;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub ledger: PointsLedger,
}

impl AppState {
    pub fn new(db: DatabaseConnection, ledger: PointsLedger) -> Self {
        Self { db, ledger }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod alert_preferences;
    pub mod alerts;
    pub mod driver_balance_changes;
    pub mod driver_sponsor;
    pub mod drivers;
    pub mod order_items;
    pub mod orders;
    pub mod sponsors;
    pub mod transactions;
}

pub mod services {
    pub mod alerts;
    pub mod cart;
    pub mod directory;
    pub mod enrollment;
    pub mod ledger_store;
    pub mod notifier;
    pub(crate) mod order_recorder;
    pub mod orders;
    pub mod points_ledger;
    pub mod reports;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
