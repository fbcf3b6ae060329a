//! Driver alerts
//!
//! Alerts are best-effort observers of ledger mutations: they are written in a
//! savepoint of the caller's transaction, and a failure rolls back only that
//! savepoint. POINTS and ORDER alerts honour the recipient's preferences.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseTransaction, DbErr, Set, TransactionTrait,
};
use tracing::{debug, warn};

use crate::entities::alerts;
use crate::models::alert::AlertType;
use crate::services::alerts::load_toggles;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn create_alert(
        &self,
        conn: &DatabaseTransaction,
        user_id: i32,
        alert_type: AlertType,
        details: &str,
    ) -> Result<(), DbErr>;
}

/// Writes alerts to the `alerts` table
#[derive(Clone, Copy, Debug, Default)]
pub struct DbNotifier;

#[async_trait]
impl Notifier for DbNotifier {
    async fn create_alert(
        &self,
        conn: &DatabaseTransaction,
        user_id: i32,
        alert_type: AlertType,
        details: &str,
    ) -> Result<(), DbErr> {
        insert_alert(conn, user_id, alert_type, details).await
    }
}

pub(crate) async fn insert_alert<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    alert_type: AlertType,
    details: &str,
) -> Result<(), DbErr> {
    alerts::ActiveModel {
        user_id: Set(user_id),
        alert_type: Set(alert_type.as_str().to_string()),
        details: Set(details.to_string()),
        seen: Set(false),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Send an alert without letting its failure abort the enclosing transaction.
///
/// Returns whether the alert was written. A muted alert type is skipped.
pub(crate) async fn notify_best_effort(
    notifier: &dyn Notifier,
    txn: &DatabaseTransaction,
    user_id: i32,
    alert_type: AlertType,
    details: &str,
) -> bool {
    let savepoint = match txn.begin().await {
        Ok(savepoint) => savepoint,
        Err(e) => {
            warn!(user_id, alert_type = %alert_type, error = %e, "Could not open alert savepoint");
            return false;
        }
    };

    let outcome = match load_toggles(&savepoint, user_id).await {
        Ok(toggles) if !toggles.allows(alert_type) => {
            debug!(user_id, alert_type = %alert_type, "Alert muted by preferences");
            Ok(false)
        }
        Ok(_) => notifier
            .create_alert(&savepoint, user_id, alert_type, details)
            .await
            .map(|()| true),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(delivered) => match savepoint.commit().await {
            Ok(()) => delivered,
            Err(e) => {
                warn!(user_id, alert_type = %alert_type, error = %e, "Alert savepoint release failed");
                false
            }
        },
        Err(e) => {
            warn!(user_id, alert_type = %alert_type, error = %e, "Alert not delivered");
            if let Err(e) = savepoint.rollback().await {
                warn!(user_id, error = %e, "Alert savepoint rollback failed");
            }
            false
        }
    }
}
