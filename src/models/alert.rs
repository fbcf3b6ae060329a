use serde::{Deserialize, Serialize};

use crate::entities::{alert_preferences, alerts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertType {
    /// Balance changed by a sponsor award or deduction
    Points,
    /// Order placed, refunded or moved to a new status
    Order,
    /// Enrollment approved or dropped
    Enrollment,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Points => "POINTS",
            AlertType::Order => "ORDER",
            AlertType::Enrollment => "ENROLLMENT",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertListQuery {
    #[serde(default)]
    pub unseen_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    pub alert_id: i32,
    pub alert_type: String,
    pub details: String,
    pub seen: bool,
    pub created_at: String,
}

impl From<alerts::Model> for AlertResponse {
    fn from(model: alerts::Model) -> Self {
        Self {
            alert_id: model.alert_id,
            alert_type: model.alert_type,
            details: model.details,
            seen: model.seen,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertListResponse {
    pub alerts: Vec<AlertResponse>,
    pub unseen: usize,
}

/// Which optional alerts a user receives. ENROLLMENT alerts cannot be muted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertToggles {
    pub points_alert: bool,
    pub order_alert: bool,
}

impl Default for AlertToggles {
    fn default() -> Self {
        Self {
            points_alert: true,
            order_alert: true,
        }
    }
}

impl AlertToggles {
    pub fn allows(&self, alert_type: AlertType) -> bool {
        match alert_type {
            AlertType::Points => self.points_alert,
            AlertType::Order => self.order_alert,
            AlertType::Enrollment => true,
        }
    }
}

impl From<alert_preferences::Model> for AlertToggles {
    fn from(model: alert_preferences::Model) -> Self {
        Self {
            points_alert: model.points_alert,
            order_alert: model.order_alert,
        }
    }
}

/// PUT /api/alerts/preferences; omitted fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub points_alert: Option<bool>,
    #[serde(default)]
    pub order_alert: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllSeenResponse {
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_alerts_ignore_toggles() {
        let muted = AlertToggles {
            points_alert: false,
            order_alert: false,
        };
        assert!(!muted.allows(AlertType::Points));
        assert!(!muted.allows(AlertType::Order));
        assert!(muted.allows(AlertType::Enrollment));

        let defaults = AlertToggles::default();
        assert!(defaults.allows(AlertType::Points));
        assert!(defaults.allows(AlertType::Order));
    }
}
