//! Balance, award and purchase endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::error::LedgerError;
use crate::handlers::auth::{caller_scope, ensure, forbidden};
use crate::handlers::{ApiError, map_ledger_error};
use crate::models::ledger::{AwardReceipt, AwardRequest, BalanceResponse};
use crate::models::order::{PurchaseReceipt, PurchaseRequest};
use crate::models::points::Points;
use crate::models::role::{Caller, Scope};
use crate::AppState;

/// GET /api/drivers/{driver_id}/sponsors/{sponsor_id}/balance
pub async fn get_balance(
    State(state): State<AppState>,
    caller: Caller,
    Path((driver_id, sponsor_id)): Path<(i32, i32)>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let scope = caller_scope(&state, &caller).await?;
    ensure(
        scope.can_access_link(driver_id, sponsor_id),
        "balance belongs to another account",
    )?;

    let balance = state
        .ledger
        .get_balance(driver_id, sponsor_id)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(BalanceResponse {
        driver_id,
        sponsor_id,
        balance,
        balance_dollars: balance.to_dollars(),
    }))
}

/// POST /api/points/award
///
/// Sponsors award against their own sponsorship; admins must name the sponsor.
pub async fn award_points(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<AwardRequest>,
) -> Result<Json<AwardReceipt>, ApiError> {
    let scope = caller_scope(&state, &caller).await?;
    let sponsor_id = match scope {
        Scope::Admin => payload.sponsor_id.ok_or_else(|| {
            map_ledger_error(LedgerError::InvalidRequest(
                "sponsor_id is required".to_string(),
            ))
        })?,
        Scope::Sponsor { sponsor_id } => {
            ensure(
                payload.sponsor_id.is_none_or(|requested| requested == sponsor_id),
                "cannot award points for another sponsor",
            )?;
            sponsor_id
        }
        Scope::Driver { .. } => return Err(forbidden("drivers cannot award points")),
    };

    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(map_ledger_error(LedgerError::InvalidRequest(
            "reason is required".to_string(),
        )));
    }

    let receipt = state
        .ledger
        .award(
            payload.driver_id,
            sponsor_id,
            Points::new(payload.points),
            reason,
            caller.user_id,
        )
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(receipt))
}

/// POST /api/purchases
pub async fn purchase(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseReceipt>), ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    info!(
        correlation_id = %correlation_id,
        user_id = caller.user_id,
        sponsor_id = payload.sponsor_id,
        items = payload.items.len(),
        "Purchase request received"
    );

    let scope = caller_scope(&state, &caller).await?;
    let driver_id = match scope {
        Scope::Admin => payload.driver_id.ok_or_else(|| {
            map_ledger_error(LedgerError::InvalidRequest(
                "driver_id is required".to_string(),
            ))
        })?,
        Scope::Driver { driver_id } => {
            ensure(
                payload.driver_id.is_none_or(|requested| requested == driver_id),
                "cannot purchase for another driver",
            )?;
            driver_id
        }
        Scope::Sponsor { .. } => return Err(forbidden("sponsors cannot place purchases")),
    };

    let receipt = state
        .ledger
        .purchase(driver_id, payload.sponsor_id, &payload.items)
        .await
        .map_err(|e| {
            info!(correlation_id = %correlation_id, error = %e, "Purchase rejected");
            map_ledger_error(e)
        })?;

    info!(
        correlation_id = %correlation_id,
        order_id = receipt.order_id,
        "Purchase completed"
    );
    Ok((StatusCode::CREATED, Json(receipt)))
}
