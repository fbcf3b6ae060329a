//! Alert inbox endpoints. Every caller sees only alerts addressed to their own user.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::handlers::{ApiError, map_ledger_error};
use crate::models::alert::{
    AlertListQuery, AlertListResponse, AlertResponse, AlertToggles, MarkAllSeenResponse,
    UpdatePreferencesRequest,
};
use crate::models::role::Caller;
use crate::services::alerts as alert_service;
use crate::AppState;

/// GET /api/alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<AlertListQuery>,
) -> Result<Json<AlertListResponse>, ApiError> {
    let alerts: Vec<AlertResponse> =
        alert_service::list_alerts(&state.db, caller.user_id, query.unseen_only)
            .await
            .map_err(map_ledger_error)?
            .into_iter()
            .map(AlertResponse::from)
            .collect();

    let unseen = alerts.iter().filter(|a| !a.seen).count();
    Ok(Json(AlertListResponse { alerts, unseen }))
}

/// POST /api/alerts/{alert_id}/seen
pub async fn mark_seen(
    State(state): State<AppState>,
    caller: Caller,
    Path(alert_id): Path<i32>,
) -> Result<Json<AlertResponse>, ApiError> {
    let alert = alert_service::mark_seen(&state.db, caller.user_id, alert_id)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(alert.into()))
}

/// PUT /api/alerts/read-all
pub async fn mark_all_seen(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<MarkAllSeenResponse>, ApiError> {
    let updated = alert_service::mark_all_seen(&state.db, caller.user_id)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(MarkAllSeenResponse { updated }))
}

/// GET /api/alerts/preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<AlertToggles>, ApiError> {
    let toggles = alert_service::get_preferences(&state.db, caller.user_id)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(toggles))
}

/// PUT /api/alerts/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<AlertToggles>, ApiError> {
    let toggles = alert_service::update_preferences(&state.db, caller.user_id, payload)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(toggles))
}

/// DELETE /api/alerts/{alert_id}
pub async fn delete_alert(
    State(state): State<AppState>,
    caller: Caller,
    Path(alert_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    alert_service::delete_alert(&state.db, caller.user_id, alert_id)
        .await
        .map_err(map_ledger_error)?;
    Ok(StatusCode::NO_CONTENT)
}
