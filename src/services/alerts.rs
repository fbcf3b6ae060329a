//! Alert inbox

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, Order, QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use tracing::info;

use crate::entities::alert_preferences::{self, Entity as AlertPreferences};
use crate::entities::alerts::{self, Entity as Alerts};
use crate::error::LedgerError;
use crate::models::alert::{AlertToggles, UpdatePreferencesRequest};

pub async fn list_alerts(
    db: &DatabaseConnection,
    user_id: i32,
    unseen_only: bool,
) -> Result<Vec<alerts::Model>, LedgerError> {
    let mut select = Alerts::find().filter(alerts::Column::UserId.eq(user_id));
    if unseen_only {
        select = select.filter(alerts::Column::Seen.eq(false));
    }
    Ok(select
        .order_by(alerts::Column::CreatedAt, Order::Desc)
        .order_by(alerts::Column::AlertId, Order::Desc)
        .all(db)
        .await?)
}

pub async fn mark_seen(
    db: &DatabaseConnection,
    user_id: i32,
    alert_id: i32,
) -> Result<alerts::Model, LedgerError> {
    let alert = find_owned(db, user_id, alert_id).await?;
    if alert.seen {
        return Ok(alert);
    }
    let mut active_model: alerts::ActiveModel = alert.into();
    active_model.seen = Set(true);
    Ok(active_model.update(db).await?)
}

/// Returns how many alerts flipped to seen
pub async fn mark_all_seen(db: &DatabaseConnection, user_id: i32) -> Result<u64, LedgerError> {
    let result = Alerts::update_many()
        .col_expr(alerts::Column::Seen, Expr::value(true))
        .filter(alerts::Column::UserId.eq(user_id))
        .filter(alerts::Column::Seen.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_alert(
    db: &DatabaseConnection,
    user_id: i32,
    alert_id: i32,
) -> Result<(), LedgerError> {
    let alert = find_owned(db, user_id, alert_id).await?;
    alert.delete(db).await?;
    Ok(())
}

/// Another user's alert is reported as missing
async fn find_owned(
    db: &DatabaseConnection,
    user_id: i32,
    alert_id: i32,
) -> Result<alerts::Model, LedgerError> {
    Alerts::find_by_id(alert_id)
        .filter(alerts::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(LedgerError::AlertNotFound(alert_id))
}

pub(crate) async fn load_toggles<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<AlertToggles, DbErr> {
    Ok(AlertPreferences::find_by_id(user_id)
        .one(conn)
        .await?
        .map(AlertToggles::from)
        .unwrap_or_default())
}

pub async fn get_preferences(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<AlertToggles, LedgerError> {
    Ok(load_toggles(db, user_id).await?)
}

pub async fn update_preferences(
    db: &DatabaseConnection,
    user_id: i32,
    update: UpdatePreferencesRequest,
) -> Result<AlertToggles, LedgerError> {
    let now = Utc::now().fixed_offset();
    let saved = match AlertPreferences::find_by_id(user_id).one(db).await? {
        Some(existing) => {
            let mut active_model: alert_preferences::ActiveModel = existing.into();
            if let Some(points_alert) = update.points_alert {
                active_model.points_alert = Set(points_alert);
            }
            if let Some(order_alert) = update.order_alert {
                active_model.order_alert = Set(order_alert);
            }
            active_model.updated_at = Set(now);
            active_model.update(db).await?
        }
        None => {
            let defaults = AlertToggles::default();
            alert_preferences::ActiveModel {
                user_id: Set(user_id),
                points_alert: Set(update.points_alert.unwrap_or(defaults.points_alert)),
                order_alert: Set(update.order_alert.unwrap_or(defaults.order_alert)),
                updated_at: Set(now),
            }
            .insert(db)
            .await?
        }
    };

    info!(
        user_id,
        points_alert = saved.points_alert,
        order_alert = saved.order_alert,
        "Alert preferences updated"
    );
    Ok(saved.into())
}
