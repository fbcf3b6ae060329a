use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::points::Points;

/// POST /api/points/award
///
/// `points` is signed: a negative value is a sponsor deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardRequest {
    pub driver_id: i32,
    /// Required for admins, defaults to the caller for sponsors
    #[serde(default)]
    pub sponsor_id: Option<i32>,
    pub points: i64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardReceipt {
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub points_change: Points,
    pub previous_balance: Points,
    pub new_balance: Points,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub balance: Points,
    pub balance_dollars: Decimal,
}
