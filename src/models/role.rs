//! Caller roles

use serde::{Deserialize, Serialize};

/// Account role forwarded by the authentication gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Sponsor,
    Driver,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Sponsor => write!(f, "sponsor"),
            Role::Driver => write!(f, "driver"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "sponsor" => Ok(Role::Sponsor),
            "driver" => Ok(Role::Driver),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i32,
    pub role: Role,
}

/// What a caller may touch, resolved against the directory tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Admin,
    Sponsor { sponsor_id: i32 },
    Driver { driver_id: i32 },
}

impl Scope {
    pub fn can_access_sponsor(&self, sponsor_id: i32) -> bool {
        match self {
            Scope::Admin => true,
            Scope::Sponsor { sponsor_id: own } => *own == sponsor_id,
            Scope::Driver { .. } => false,
        }
    }

    /// Drivers see their own side of a link, sponsors theirs
    pub fn can_access_link(&self, driver_id: i32, sponsor_id: i32) -> bool {
        match self {
            Scope::Admin => true,
            Scope::Sponsor { sponsor_id: own } => *own == sponsor_id,
            Scope::Driver { driver_id: own } => *own == driver_id,
        }
    }
}
