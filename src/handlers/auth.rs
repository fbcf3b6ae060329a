//! Caller identity forwarded by the gateway in `X-User-Id` / `X-User-Role`

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tracing::warn;

use crate::error::LedgerError;
use crate::handlers::{ApiError, map_ledger_error};
use crate::models::error::ErrorResponse;
use crate::models::role::{Caller, Role, Scope};
use crate::services::directory::resolve_scope;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i32>().ok());
        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<Role>().ok());

        match (user_id, role) {
            (Some(user_id), Some(role)) => Ok(Caller { user_id, role }),
            _ => {
                warn!("Missing or malformed caller headers");
                Err(unauthorized())
            }
        }
    }
}

fn unauthorized() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(
            "Missing or invalid caller identity",
            "UNAUTHORIZED",
        )),
    )
}

/// Directory-backed scope of the caller
pub async fn caller_scope(state: &AppState, caller: &Caller) -> Result<Scope, ApiError> {
    resolve_scope(&state.db, caller)
        .await
        .map_err(map_ledger_error)
}

pub fn forbidden(message: impl Into<String>) -> ApiError {
    map_ledger_error(LedgerError::Forbidden(message.into()))
}

/// Fail with 403 unless `allowed`
pub fn ensure(allowed: bool, message: &str) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(forbidden(message))
    }
}
