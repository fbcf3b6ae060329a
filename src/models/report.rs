//! Reporting models for point history and driver spending

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::driver_balance_changes;
use crate::models::points::Points;

/// Shared filters: inclusive created-date range plus optional driver/sponsor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    pub driver_id: Option<i32>,
    pub sponsor_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsHistoryEntry {
    pub balance_change_id: i32,
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub reason: String,
    pub points_change: Points,
    pub balance_after: Points,
    pub actor_id: Option<i32>,
    pub created_at: String,
}

impl From<driver_balance_changes::Model> for PointsHistoryEntry {
    fn from(model: driver_balance_changes::Model) -> Self {
        Self {
            balance_change_id: model.balance_change_id,
            driver_id: model.driver_id,
            sponsor_id: model.sponsor_id,
            reason: model.reason,
            points_change: Points::new(model.points_change),
            balance_after: Points::new(model.balance_after),
            actor_id: model.actor_id,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsHistoryResponse {
    pub entries: Vec<PointsHistoryEntry>,
    pub total_awarded: Points,
    pub total_deducted: Points,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummaryRow {
    pub driver_id: i32,
    pub sponsor_id: i32,
    /// Purchased line items in range
    pub line_items: u64,
    pub points_spent: Points,
    pub dollars_spent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummaryResponse {
    pub rows: Vec<SpendingSummaryRow>,
    pub points_spent: Points,
    pub dollars_spent: Decimal,
}
