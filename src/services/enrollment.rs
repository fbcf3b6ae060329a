//! Driver/sponsor enrollment lifecycle

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::info;

use crate::entities::{driver_sponsor, drivers, prelude::*};
use crate::error::LedgerError;
use crate::models::alert::AlertType;
use crate::models::enrollment::{EnrollmentListEntry, LinkStatus};
use crate::services::directory::driver_user_id;
use crate::services::notifier::{Notifier, notify_best_effort};

/// Driver applies to a sponsor: creates a PENDING link with an empty balance
pub async fn apply(
    db: &DatabaseConnection,
    driver_id: i32,
    sponsor_id: i32,
) -> Result<driver_sponsor::Model, LedgerError> {
    if Drivers::find_by_id(driver_id).one(db).await?.is_none() {
        return Err(LedgerError::DriverNotFound(driver_id));
    }
    if Sponsors::find_by_id(sponsor_id).one(db).await?.is_none() {
        return Err(LedgerError::SponsorNotFound(sponsor_id));
    }

    let existing = DriverSponsor::find()
        .filter(driver_sponsor::Column::DriverId.eq(driver_id))
        .filter(driver_sponsor::Column::SponsorId.eq(sponsor_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(LedgerError::LinkAlreadyExists {
            driver_id,
            sponsor_id,
        });
    }

    let link = insert_pending_link(db, driver_id, sponsor_id).await?;
    info!(driver_id, sponsor_id, "Enrollment requested");
    Ok(link)
}

/// A concurrent application for the same pair loses on the unique index
async fn insert_pending_link<C: ConnectionTrait>(
    conn: &C,
    driver_id: i32,
    sponsor_id: i32,
) -> Result<driver_sponsor::Model, LedgerError> {
    driver_sponsor::ActiveModel {
        driver_id: Set(driver_id),
        sponsor_id: Set(sponsor_id),
        balance: Set(0),
        status: Set(LinkStatus::Pending.as_str().to_string()),
        since_at: Set(None),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => LedgerError::LinkAlreadyExists {
            driver_id,
            sponsor_id,
        },
        _ => LedgerError::PersistenceFailure(e),
    })
}

/// Sponsor accepts a pending driver
pub async fn approve(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    driver_id: i32,
    sponsor_id: i32,
) -> Result<driver_sponsor::Model, LedgerError> {
    let txn = db.begin().await?;
    let link = transition(&txn, driver_id, sponsor_id, LinkStatus::Active).await?;

    if let Some(user_id) = driver_user_id(&txn, driver_id).await? {
        let details = format!(
            "Your application to sponsor #{} has been approved.",
            sponsor_id
        );
        notify_best_effort(notifier, &txn, user_id, AlertType::Enrollment, &details).await;
    }

    txn.commit().await?;
    info!(driver_id, sponsor_id, "Enrollment approved");
    Ok(link)
}

/// End an active enrollment; the driver is always told they were dropped
pub async fn deactivate(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    driver_id: i32,
    sponsor_id: i32,
) -> Result<driver_sponsor::Model, LedgerError> {
    let txn = db.begin().await?;
    let link = transition(&txn, driver_id, sponsor_id, LinkStatus::Inactive).await?;

    if let Some(user_id) = driver_user_id(&txn, driver_id).await? {
        let details = format!("You have been dropped by sponsor #{}.", sponsor_id);
        notify_best_effort(notifier, &txn, user_id, AlertType::Enrollment, &details).await;
    }

    txn.commit().await?;
    info!(driver_id, sponsor_id, "Enrollment deactivated");
    Ok(link)
}

/// A sponsor's links, newest first, with each driver's name and how many
/// sponsors they are currently active with
pub async fn list_links(
    db: &DatabaseConnection,
    sponsor_id: i32,
    status: Option<LinkStatus>,
) -> Result<Vec<EnrollmentListEntry>, LedgerError> {
    let mut select = DriverSponsor::find().filter(driver_sponsor::Column::SponsorId.eq(sponsor_id));
    if let Some(status) = status {
        select = select.filter(driver_sponsor::Column::Status.eq(status.as_str()));
    }
    let links = select
        .order_by(driver_sponsor::Column::CreatedAt, Order::Desc)
        .order_by(driver_sponsor::Column::DriverSponsorId, Order::Desc)
        .all(db)
        .await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let driver_ids: Vec<i32> = links.iter().map(|l| l.driver_id).collect();
    let names: HashMap<i32, drivers::Model> = Drivers::find()
        .filter(drivers::Column::DriverId.is_in(driver_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.driver_id, d))
        .collect();

    let mut active_counts: HashMap<i32, u64> = HashMap::new();
    for active in DriverSponsor::find()
        .filter(driver_sponsor::Column::DriverId.is_in(driver_ids))
        .filter(driver_sponsor::Column::Status.eq(LinkStatus::Active.as_str()))
        .all(db)
        .await?
    {
        *active_counts.entry(active.driver_id).or_default() += 1;
    }

    Ok(links
        .into_iter()
        .map(|link| {
            let driver = names.get(&link.driver_id);
            EnrollmentListEntry {
                first_name: driver.map(|d| d.first_name.clone()).unwrap_or_default(),
                last_name: driver.map(|d| d.last_name.clone()).unwrap_or_default(),
                active_sponsor_count: active_counts.get(&link.driver_id).copied().unwrap_or(0),
                link: link.into(),
            }
        })
        .collect())
}

async fn transition(
    txn: &DatabaseTransaction,
    driver_id: i32,
    sponsor_id: i32,
    next: LinkStatus,
) -> Result<driver_sponsor::Model, LedgerError> {
    let link = DriverSponsor::find()
        .filter(driver_sponsor::Column::DriverId.eq(driver_id))
        .filter(driver_sponsor::Column::SponsorId.eq(sponsor_id))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(LedgerError::LinkNotFound {
            driver_id,
            sponsor_id,
        })?;

    let current: LinkStatus = link
        .status
        .parse()
        .map_err(|_| LedgerError::corrupt("enrollment status", &link.status))?;
    if !current.can_transition_to(next) {
        return Err(LedgerError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        });
    }

    let mut active_model: driver_sponsor::ActiveModel = link.into();
    active_model.status = Set(next.as_str().to_string());
    if next == LinkStatus::Active {
        active_model.since_at = Set(Some(Utc::now().fixed_offset()));
    }
    Ok(active_model.update(txn).await?)
}
