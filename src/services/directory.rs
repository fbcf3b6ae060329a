//! Driver and sponsor directory lookups

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{drivers, prelude::*, sponsors};
use crate::error::LedgerError;
use crate::models::role::{Caller, Role, Scope};

/// Resolve the caller's role into the rows it may act on
pub async fn resolve_scope<C: ConnectionTrait>(
    conn: &C,
    caller: &Caller,
) -> Result<Scope, LedgerError> {
    match caller.role {
        Role::Admin => Ok(Scope::Admin),
        Role::Sponsor => {
            let sponsor = Sponsors::find()
                .filter(sponsors::Column::UserId.eq(caller.user_id))
                .one(conn)
                .await?
                .ok_or_else(|| {
                    LedgerError::Forbidden(format!("user {} is not a sponsor", caller.user_id))
                })?;
            Ok(Scope::Sponsor {
                sponsor_id: sponsor.sponsor_id,
            })
        }
        Role::Driver => {
            let driver = Drivers::find()
                .filter(drivers::Column::UserId.eq(caller.user_id))
                .one(conn)
                .await?
                .ok_or_else(|| {
                    LedgerError::Forbidden(format!("user {} is not a driver", caller.user_id))
                })?;
            Ok(Scope::Driver {
                driver_id: driver.driver_id,
            })
        }
    }
}

/// User account behind a driver, the recipient of driver alerts
pub async fn driver_user_id<C: ConnectionTrait>(
    conn: &C,
    driver_id: i32,
) -> Result<Option<i32>, LedgerError> {
    Ok(Drivers::find_by_id(driver_id)
        .one(conn)
        .await?
        .map(|driver| driver.user_id))
}
