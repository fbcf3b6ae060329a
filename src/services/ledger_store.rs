//! Ledger store: the single mutation path for driver/sponsor balances
//!
//! Every adjustment locks the `driver_sponsor` row (`SELECT ... FOR UPDATE`)
//! inside the caller's transaction, so two writers on the same pair are
//! strictly ordered and different pairs never contend.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Select, Set,
};
use tracing::debug;

use crate::entities::driver_sponsor::{self, Entity as DriverSponsor};
use crate::error::LedgerError;
use crate::models::enrollment::LinkStatus;
use crate::models::points::Points;

/// Outcome of one committed-or-pending balance write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAdjustment {
    pub driver_sponsor_id: i32,
    pub previous_balance: Points,
    pub new_balance: Points,
}

/// Current balance of an ACTIVE link
pub async fn get_balance<C: ConnectionTrait>(
    conn: &C,
    driver_id: i32,
    sponsor_id: i32,
) -> Result<Points, LedgerError> {
    let link = find_link(conn, driver_id, sponsor_id, false).await?;
    ensure_active(&link)?;
    Ok(Points::new(link.balance))
}

/// Apply `delta` to an ACTIVE link's balance.
///
/// With `allow_negative == false` a result below zero fails with
/// `InsufficientBalance` and nothing is written.
pub async fn adjust_balance(
    txn: &DatabaseTransaction,
    driver_id: i32,
    sponsor_id: i32,
    delta: Points,
    allow_negative: bool,
) -> Result<BalanceAdjustment, LedgerError> {
    let link = find_link(txn, driver_id, sponsor_id, true).await?;
    ensure_active(&link)?;
    apply_delta(txn, link, delta, allow_negative).await
}

/// Credit a link whatever its enrollment status.
///
/// Used for refunds: points owed back to a driver are returned even after the
/// enrollment has been deactivated.
pub(crate) async fn credit_any_status(
    txn: &DatabaseTransaction,
    driver_id: i32,
    sponsor_id: i32,
    credit: Points,
) -> Result<BalanceAdjustment, LedgerError> {
    if credit.is_negative() {
        return Err(LedgerError::InvalidAmount(format!(
            "credit must not be negative, got {}",
            credit
        )));
    }
    let link = find_link(txn, driver_id, sponsor_id, true).await?;
    apply_delta(txn, link, credit, true).await
}

async fn find_link<C: ConnectionTrait>(
    conn: &C,
    driver_id: i32,
    sponsor_id: i32,
    for_update: bool,
) -> Result<driver_sponsor::Model, LedgerError> {
    link_query(driver_id, sponsor_id, for_update)
        .one(conn)
        .await?
        .ok_or(LedgerError::LinkNotFound {
            driver_id,
            sponsor_id,
        })
}

/// Lookup of one link; `for_update` adds `FOR UPDATE` on backends that support it
pub(crate) fn link_query(
    driver_id: i32,
    sponsor_id: i32,
    for_update: bool,
) -> Select<DriverSponsor> {
    let query = DriverSponsor::find()
        .filter(driver_sponsor::Column::DriverId.eq(driver_id))
        .filter(driver_sponsor::Column::SponsorId.eq(sponsor_id));

    if for_update {
        query.lock_exclusive()
    } else {
        query
    }
}

fn ensure_active(link: &driver_sponsor::Model) -> Result<(), LedgerError> {
    let status: LinkStatus = link
        .status
        .parse()
        .map_err(|_| LedgerError::corrupt("enrollment status", &link.status))?;

    if status != LinkStatus::Active {
        return Err(LedgerError::LinkNotFound {
            driver_id: link.driver_id,
            sponsor_id: link.sponsor_id,
        });
    }
    Ok(())
}

async fn apply_delta(
    txn: &DatabaseTransaction,
    link: driver_sponsor::Model,
    delta: Points,
    allow_negative: bool,
) -> Result<BalanceAdjustment, LedgerError> {
    let previous_balance = Points::new(link.balance);
    let new_balance = previous_balance
        .checked_add(delta)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("{} overflows the balance", delta)))?;

    if new_balance.is_negative() && !allow_negative {
        return Err(LedgerError::InsufficientBalance {
            required: delta.checked_neg().unwrap_or(Points::new(i64::MAX)),
            available: previous_balance,
        });
    }

    let driver_sponsor_id = link.driver_sponsor_id;
    let mut active_model: driver_sponsor::ActiveModel = link.into();
    active_model.balance = Set(new_balance.value());
    active_model.update(txn).await?;

    debug!(
        driver_sponsor_id,
        previous = previous_balance.value(),
        new = new_balance.value(),
        "Balance adjusted"
    );

    Ok(BalanceAdjustment {
        driver_sponsor_id,
        previous_balance,
        new_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_adjustment_lookup_locks_row_on_postgres() {
        let sql = link_query(1, 2, true).build(DbBackend::Postgres).sql;
        assert!(sql.ends_with("FOR UPDATE"), "unexpected statement: {}", sql);
    }

    #[test]
    fn test_plain_read_takes_no_lock() {
        let sql = link_query(1, 2, false).build(DbBackend::Postgres).sql;
        assert!(!sql.contains("FOR UPDATE"));
    }
}
