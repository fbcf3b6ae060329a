//! `SeaORM` entity prelude

pub use super::alert_preferences::Entity as AlertPreferences;
pub use super::alerts::Entity as Alerts;
pub use super::driver_balance_changes::Entity as DriverBalanceChanges;
pub use super::driver_sponsor::Entity as DriverSponsor;
pub use super::drivers::Entity as Drivers;
pub use super::order_items::Entity as OrderItems;
pub use super::orders::Entity as Orders;
pub use super::sponsors::Entity as Sponsors;
pub use super::transactions::Entity as Transactions;
