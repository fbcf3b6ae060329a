//! Order endpoints: listing, detail edits, cancellation and status changes

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::info;

use crate::handlers::auth::{caller_scope, ensure};
use crate::handlers::{ApiError, map_ledger_error};
use crate::models::order::{
    OrderListQuery, OrderListResponse, OrderResponse, RefundReceipt, RefundRequest,
    StatusTransitionRequest, TransitionReceipt, UpdateOrderRequest,
};
use crate::models::role::{Caller, Scope};
use crate::services::orders as order_service;
use crate::AppState;

const DEFAULT_CANCEL_REASON: &str = "Order cancelled by user";

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    caller: Caller,
    Query(mut query): Query<OrderListQuery>,
) -> Result<Json<OrderListResponse>, ApiError> {
    match caller_scope(&state, &caller).await? {
        Scope::Admin => {}
        Scope::Sponsor { sponsor_id } => {
            ensure(
                query.sponsor_id.is_none_or(|requested| requested == sponsor_id),
                "cannot list another sponsor's orders",
            )?;
            query.sponsor_id = Some(sponsor_id);
        }
        Scope::Driver { driver_id } => {
            ensure(
                query.driver_id.is_none_or(|requested| requested == driver_id),
                "cannot list another driver's orders",
            )?;
            query.driver_id = Some(driver_id);
        }
    }

    let orders = order_service::list_orders(&state.db, &query)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(OrderListResponse {
        total: orders.len(),
        orders,
    }))
}

/// GET /api/orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(order_id): Path<i32>,
) -> Result<Json<OrderResponse>, ApiError> {
    let scope = caller_scope(&state, &caller).await?;
    let order = order_service::get_order(&state.db, order_id)
        .await
        .map_err(map_ledger_error)?;
    ensure(
        scope.can_access_link(order.driver_id, order.sponsor_id),
        "order belongs to another account",
    )?;
    Ok(Json(order))
}

/// PUT /api/orders/{order_id}
pub async fn update_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(order_id): Path<i32>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    authorize_fulfilment(&state, &caller, order_id).await?;

    let order = order_service::update_order_details(&state.db, order_id, &payload)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(order))
}

/// POST /api/orders/{order_id}/cancel
///
/// Refunds the full order total. Only PENDING orders qualify.
pub async fn cancel_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(order_id): Path<i32>,
    Json(payload): Json<RefundRequest>,
) -> Result<Json<RefundReceipt>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let scope = caller_scope(&state, &caller).await?;
    let order = order_service::find_order(&state.db, order_id)
        .await
        .map_err(map_ledger_error)?;
    ensure(
        scope.can_access_link(order.driver_id, order.sponsor_id),
        "order belongs to another account",
    )?;

    let reason = payload
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_CANCEL_REASON);

    info!(
        correlation_id = %correlation_id,
        order_id,
        user_id = caller.user_id,
        "Cancelling order"
    );

    let receipt = state
        .ledger
        .refund(order_id, reason, caller.user_id)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(receipt))
}

/// PUT /api/orders/{order_id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(order_id): Path<i32>,
    Json(payload): Json<StatusTransitionRequest>,
) -> Result<Json<TransitionReceipt>, ApiError> {
    authorize_fulfilment(&state, &caller, order_id).await?;

    let receipt = state
        .ledger
        .transition_order(order_id, payload.status)
        .await
        .map_err(map_ledger_error)?;
    Ok(Json(receipt))
}

/// Fulfilment edits are for the order's sponsor or an admin
async fn authorize_fulfilment(
    state: &AppState,
    caller: &Caller,
    order_id: i32,
) -> Result<(), ApiError> {
    let scope = caller_scope(state, caller).await?;
    let order = order_service::find_order(&state.db, order_id)
        .await
        .map_err(map_ledger_error)?;
    ensure(
        scope.can_access_sponsor(order.sponsor_id),
        "only the sponsor can update this order",
    )
}
