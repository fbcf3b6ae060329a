use axum::{
    Json,
    extract::{Query, State},
};

use crate::handlers::auth::{caller_scope, ensure, forbidden};
use crate::handlers::{ApiError, map_ledger_error};
use crate::models::report::{PointsHistoryResponse, ReportQuery, SpendingSummaryResponse};
use crate::models::role::{Caller, Scope};
use crate::services::reports;
use crate::AppState;

/// GET /api/reports/points
///
/// Drivers see their own history, sponsors the history of their drivers.
pub async fn points_history(
    State(state): State<AppState>,
    caller: Caller,
    Query(mut query): Query<ReportQuery>,
) -> Result<Json<PointsHistoryResponse>, ApiError> {
    match caller_scope(&state, &caller).await? {
        Scope::Admin => {}
        Scope::Sponsor { sponsor_id } => restrict_sponsor(&mut query, sponsor_id)?,
        Scope::Driver { driver_id } => {
            ensure(
                query.driver_id.is_none_or(|requested| requested == driver_id),
                "cannot view another driver's history",
            )?;
            query.driver_id = Some(driver_id);
        }
    }

    let report = reports::points_history(&state.db, &query)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(report))
}

/// GET /api/reports/spending
pub async fn spending_summary(
    State(state): State<AppState>,
    caller: Caller,
    Query(mut query): Query<ReportQuery>,
) -> Result<Json<SpendingSummaryResponse>, ApiError> {
    match caller_scope(&state, &caller).await? {
        Scope::Admin => {}
        Scope::Sponsor { sponsor_id } => restrict_sponsor(&mut query, sponsor_id)?,
        Scope::Driver { .. } => return Err(forbidden("spending reports are for sponsors")),
    }

    let report = reports::spending_summary(&state.db, &query)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(report))
}

fn restrict_sponsor(query: &mut ReportQuery, sponsor_id: i32) -> Result<(), ApiError> {
    ensure(
        query.sponsor_id.is_none_or(|requested| requested == sponsor_id),
        "cannot report on another sponsor",
    )?;
    query.sponsor_id = Some(sponsor_id);
    Ok(())
}
