pub mod alert;
pub mod enrollment;
pub mod error;
pub mod ledger;
pub mod order;
pub mod points;
pub mod report;
pub mod role;
