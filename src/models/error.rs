use serde::{Deserialize, Serialize};

use crate::models::points::Points;

/// Error body returned by every endpoint
///
/// Balance failures also carry `required`, `available` and `shortfall` so the
/// client can tell the driver how many points are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<Points>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: Some(code.to_string()),
            required: None,
            available: None,
            shortfall: None,
        }
    }
}
