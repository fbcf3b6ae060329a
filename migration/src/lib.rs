pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_directory;
mod m20260301_000002_create_driver_sponsor;
mod m20260301_000003_create_orders;
mod m20260301_000004_create_ledger_audit;
mod m20260301_000005_create_alerts;
mod m20260301_000006_create_alert_preferences;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_directory::Migration),
            Box::new(m20260301_000002_create_driver_sponsor::Migration),
            Box::new(m20260301_000003_create_orders::Migration),
            Box::new(m20260301_000004_create_ledger_audit::Migration),
            Box::new(m20260301_000005_create_alerts::Migration),
            Box::new(m20260301_000006_create_alert_preferences::Migration),
        ]
    }
}
