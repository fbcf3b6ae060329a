use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::error::LedgerError;
use crate::handlers::auth::{caller_scope, ensure, forbidden};
use crate::handlers::{ApiError, map_ledger_error};
use crate::models::enrollment::{ApplyRequest, LinkListQuery, LinkListResponse, LinkResponse};
use crate::models::role::{Caller, Scope};
use crate::services::enrollment;
use crate::AppState;

/// POST /api/enrollments
pub async fn apply(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), ApiError> {
    let driver_id = match caller_scope(&state, &caller).await? {
        Scope::Admin => payload.driver_id.ok_or_else(|| {
            map_ledger_error(LedgerError::InvalidRequest(
                "driver_id is required".to_string(),
            ))
        })?,
        Scope::Driver { driver_id } => {
            ensure(
                payload.driver_id.is_none_or(|requested| requested == driver_id),
                "cannot apply on behalf of another driver",
            )?;
            driver_id
        }
        Scope::Sponsor { .. } => return Err(forbidden("sponsors cannot apply to sponsors")),
    };

    let link = enrollment::apply(&state.db, driver_id, payload.sponsor_id)
        .await
        .map_err(map_ledger_error)?;
    Ok((StatusCode::CREATED, Json(link.into())))
}

/// GET /api/sponsors/{sponsor_id}/enrollments
pub async fn list_links(
    State(state): State<AppState>,
    caller: Caller,
    Path(sponsor_id): Path<i32>,
    Query(query): Query<LinkListQuery>,
) -> Result<Json<LinkListResponse>, ApiError> {
    let scope = caller_scope(&state, &caller).await?;
    ensure(
        scope.can_access_sponsor(sponsor_id),
        "cannot view another sponsor's drivers",
    )?;

    let links = enrollment::list_links(&state.db, sponsor_id, query.status)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(LinkListResponse {
        count: links.len(),
        links,
    }))
}

/// POST /api/enrollments/{driver_id}/{sponsor_id}/approve
pub async fn approve(
    State(state): State<AppState>,
    caller: Caller,
    Path((driver_id, sponsor_id)): Path<(i32, i32)>,
) -> Result<Json<LinkResponse>, ApiError> {
    let scope = caller_scope(&state, &caller).await?;
    ensure(
        scope.can_access_sponsor(sponsor_id),
        "only the sponsor can approve this driver",
    )?;

    let link = enrollment::approve(&state.db, state.ledger.notifier(), driver_id, sponsor_id)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(link.into()))
}

/// POST /api/enrollments/{driver_id}/{sponsor_id}/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    caller: Caller,
    Path((driver_id, sponsor_id)): Path<(i32, i32)>,
) -> Result<Json<LinkResponse>, ApiError> {
    let scope = caller_scope(&state, &caller).await?;
    ensure(
        scope.can_access_sponsor(sponsor_id),
        "only the sponsor can deactivate this driver",
    )?;

    let link = enrollment::deactivate(&state.db, state.ledger.notifier(), driver_id, sponsor_id)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(link.into()))
}
