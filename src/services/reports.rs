//! Point history and spending reports

use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder};

use crate::entities::{driver_balance_changes, driver_sponsor, prelude::*, transactions};
use crate::error::LedgerError;
use crate::models::points::Points;
use crate::models::report::{
    PointsHistoryEntry, PointsHistoryResponse, ReportQuery, SpendingSummaryResponse,
    SpendingSummaryRow,
};
use crate::services::orders::{start_of_day, start_of_next_day};

/// Balance change log entries matching `query`, newest first
pub async fn points_history(
    db: &DatabaseConnection,
    query: &ReportQuery,
) -> Result<PointsHistoryResponse, LedgerError> {
    let mut select = DriverBalanceChanges::find();

    if let Some(driver_id) = query.driver_id {
        select = select.filter(driver_balance_changes::Column::DriverId.eq(driver_id));
    }
    if let Some(sponsor_id) = query.sponsor_id {
        select = select.filter(driver_balance_changes::Column::SponsorId.eq(sponsor_id));
    }
    if let Some(start) = query.start_date {
        select = select.filter(driver_balance_changes::Column::CreatedAt.gte(start_of_day(start)));
    }
    if let Some(end) = query.end_date {
        select =
            select.filter(driver_balance_changes::Column::CreatedAt.lt(start_of_next_day(end)));
    }

    let rows = select
        .order_by(driver_balance_changes::Column::CreatedAt, Order::Desc)
        .order_by(driver_balance_changes::Column::BalanceChangeId, Order::Desc)
        .all(db)
        .await?;

    let (total_awarded, total_deducted) = tally_changes(rows.iter().map(|r| r.points_change));

    Ok(PointsHistoryResponse {
        entries: rows.into_iter().map(PointsHistoryEntry::from).collect(),
        total_awarded,
        total_deducted,
    })
}

/// Split signed changes into (awarded, deducted) totals, clamped at `i64::MAX`
fn tally_changes(changes: impl Iterator<Item = i64>) -> (Points, Points) {
    let (mut awarded, mut deducted) = (0i64, 0i64);
    for change in changes {
        if change >= 0 {
            awarded = awarded.saturating_add(change);
        } else {
            deducted = deducted.saturating_add(change.saturating_neg());
        }
    }
    (Points::new(awarded), Points::new(deducted))
}

/// Purchase spend per driver/sponsor pair
pub async fn spending_summary(
    db: &DatabaseConnection,
    query: &ReportQuery,
) -> Result<SpendingSummaryResponse, LedgerError> {
    let mut links = DriverSponsor::find();
    if let Some(driver_id) = query.driver_id {
        links = links.filter(driver_sponsor::Column::DriverId.eq(driver_id));
    }
    if let Some(sponsor_id) = query.sponsor_id {
        links = links.filter(driver_sponsor::Column::SponsorId.eq(sponsor_id));
    }
    let links: BTreeMap<i32, driver_sponsor::Model> = links
        .all(db)
        .await?
        .into_iter()
        .map(|link| (link.driver_sponsor_id, link))
        .collect();

    if links.is_empty() {
        return Ok(SpendingSummaryResponse {
            rows: Vec::new(),
            points_spent: Points::ZERO,
            dollars_spent: Points::ZERO.to_dollars(),
        });
    }

    let mut select = Transactions::find()
        .filter(transactions::Column::DriverSponsorId.is_in(links.keys().copied()))
        .filter(transactions::Column::Amount.lt(0));
    if let Some(start) = query.start_date {
        select = select.filter(transactions::Column::Date.gte(start_of_day(start)));
    }
    if let Some(end) = query.end_date {
        select = select.filter(transactions::Column::Date.lt(start_of_next_day(end)));
    }

    // driver_sponsor_id -> (line items, points spent)
    let mut totals: BTreeMap<i32, (u64, i64)> = BTreeMap::new();
    for tx in select.all(db).await? {
        let entry = totals.entry(tx.driver_sponsor_id).or_default();
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(tx.amount.saturating_neg());
    }

    let rows: Vec<SpendingSummaryRow> = totals
        .into_iter()
        .filter_map(|(link_id, (line_items, spent))| {
            links.get(&link_id).map(|link| SpendingSummaryRow {
                driver_id: link.driver_id,
                sponsor_id: link.sponsor_id,
                line_items,
                points_spent: Points::new(spent),
                dollars_spent: Points::new(spent).to_dollars(),
            })
        })
        .collect();

    let total = Points::new(
        rows.iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.points_spent.value())),
    );

    Ok(SpendingSummaryResponse {
        rows,
        points_spent: total,
        dollars_spent: total.to_dollars(),
    })
}
