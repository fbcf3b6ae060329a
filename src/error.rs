//! Error taxonomy shared by the ledger services and the HTTP layer

use sea_orm::DbErr;
use thiserror::Error;

use crate::models::order::OrderStatus;
use crate::models::points::Points;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("No active enrollment for driver {driver_id} with sponsor {sponsor_id}")]
    LinkNotFound { driver_id: i32, sponsor_id: i32 },

    #[error("Insufficient points: required {required}, available {available}")]
    InsufficientBalance { required: Points, available: Points },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Cannot modify order {order_id} with status {status}")]
    InvalidOrderState { order_id: i32, status: OrderStatus },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Order {0} not found")]
    OrderNotFound(i32),

    #[error("Alert {0} not found")]
    AlertNotFound(i32),

    #[error("Driver {0} not found")]
    DriverNotFound(i32),

    #[error("Sponsor {0} not found")]
    SponsorNotFound(i32),

    #[error("Driver {driver_id} already has an enrollment with sponsor {sponsor_id}")]
    LinkAlreadyExists { driver_id: i32, sponsor_id: i32 },

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    PersistenceFailure(#[from] DbErr),
}

impl LedgerError {
    /// Points missing to cover a rejected deduction
    pub fn shortfall(&self) -> Option<Points> {
        match self {
            LedgerError::InsufficientBalance { required, available } => {
                Some(Points::new(required.value() - available.value()))
            }
            _ => None,
        }
    }

    /// Wrap a stored value that no longer parses as a persistence failure
    pub(crate) fn corrupt(what: &str, value: &str) -> Self {
        LedgerError::PersistenceFailure(DbErr::Custom(format!(
            "Unrecognised {} in storage: {}",
            what, value
        )))
    }
}
