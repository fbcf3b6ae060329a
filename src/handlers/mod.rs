use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::error::LedgerError;
use crate::models::error::ErrorResponse;

pub mod alerts;
pub mod auth;
pub mod enrollment;
pub mod orders;
pub mod points;
pub mod reports;

/// Rejection shared by every handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub fn map_ledger_error(err: LedgerError) -> ApiError {
    match err {
        LedgerError::LinkNotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(err.to_string(), "LINK_NOT_FOUND")),
        ),
        LedgerError::InsufficientBalance { required, available } => {
            let shortfall = err.shortfall();
            let mut body = ErrorResponse::new(err.to_string(), "INSUFFICIENT_BALANCE");
            body.required = Some(required);
            body.available = Some(available);
            body.shortfall = shortfall;
            (StatusCode::BAD_REQUEST, Json(body))
        }
        LedgerError::InvalidAmount(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(err.to_string(), "INVALID_AMOUNT")),
        ),
        LedgerError::InvalidRequest(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(err.to_string(), "INVALID_REQUEST")),
        ),
        LedgerError::InvalidOrderState { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(err.to_string(), "INVALID_ORDER_STATE")),
        ),
        LedgerError::InvalidTransition { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(err.to_string(), "INVALID_TRANSITION")),
        ),
        LedgerError::OrderNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(err.to_string(), "ORDER_NOT_FOUND")),
        ),
        LedgerError::AlertNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(err.to_string(), "ALERT_NOT_FOUND")),
        ),
        LedgerError::DriverNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(err.to_string(), "DRIVER_NOT_FOUND")),
        ),
        LedgerError::SponsorNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(err.to_string(), "SPONSOR_NOT_FOUND")),
        ),
        LedgerError::LinkAlreadyExists { .. } => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(err.to_string(), "LINK_EXISTS")),
        ),
        LedgerError::Forbidden(_) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(err.to_string(), "FORBIDDEN")),
        ),
        LedgerError::PersistenceFailure(db_err) => {
            error!("Database error: {}", db_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error", "DATABASE_ERROR")),
            )
        }
    }
}
