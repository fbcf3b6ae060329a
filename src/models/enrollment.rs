//! Driver/sponsor enrollment status and request/response models
//!
//! Status progresses: PENDING → ACTIVE → INACTIVE

use serde::{Deserialize, Serialize};

use crate::entities::driver_sponsor;
use crate::models::points::Points;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkStatus {
    /// Driver applied, sponsor has not decided
    Pending,
    /// Driver can earn and spend points with this sponsor
    Active,
    /// Enrollment ended
    Inactive,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Pending => "PENDING",
            LinkStatus::Active => "ACTIVE",
            LinkStatus::Inactive => "INACTIVE",
        }
    }

    pub fn can_transition_to(&self, next: LinkStatus) -> bool {
        matches!(
            (self, next),
            (LinkStatus::Pending, LinkStatus::Active) | (LinkStatus::Active, LinkStatus::Inactive)
        )
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(LinkStatus::Pending),
            "ACTIVE" => Ok(LinkStatus::Active),
            "INACTIVE" => Ok(LinkStatus::Inactive),
            _ => Err(format!("Unknown enrollment status: {}", s)),
        }
    }
}

/// POST /api/enrollments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    /// Required for admins, defaults to the caller for drivers
    #[serde(default)]
    pub driver_id: Option<i32>,
    pub sponsor_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkListQuery {
    pub status: Option<LinkStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    pub driver_sponsor_id: i32,
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub balance: Points,
    pub status: String,
    pub since_at: Option<String>,
    pub created_at: String,
}

impl From<driver_sponsor::Model> for LinkResponse {
    fn from(model: driver_sponsor::Model) -> Self {
        Self {
            driver_sponsor_id: model.driver_sponsor_id,
            driver_id: model.driver_id,
            sponsor_id: model.sponsor_id,
            balance: Points::new(model.balance),
            status: model.status,
            since_at: model.since_at.map(|t| t.to_rfc3339()),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// One row of a sponsor's driver list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentListEntry {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub first_name: String,
    pub last_name: String,
    /// ACTIVE links this driver holds across all sponsors
    pub active_sponsor_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub links: Vec<EnrollmentListEntry>,
    pub count: usize,
}
