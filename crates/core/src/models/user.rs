use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DeskError, DeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    VenueOwner,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::VenueOwner => "venue_owner",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> DeskResult<Self> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "venue_owner" => Ok(UserRole::VenueOwner),
            "admin" => Ok(UserRole::Admin),
            other => Err(DeskError::Validation(format!("Unknown user role: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub owned_venue_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum DashboardAccess {
    Granted { venue_id: String },
    NeedsVenueClaim,
}

impl User {
    /// Decides where a signed-in user may go.
    pub fn dashboard_access(&self) -> DeskResult<DashboardAccess> {
        if self.role != UserRole::VenueOwner {
            return Err(DeskError::AccessDenied(
                "Venue owner account required".to_string(),
            ));
        }

        Ok(match self.owned_venue_ids.first() {
            Some(venue_id) => DashboardAccess::Granted {
                venue_id: venue_id.clone(),
            },
            None => DashboardAccess::NeedsVenueClaim,
        })
    }

    pub fn owns(&self, venue_id: &str) -> bool {
        self.owned_venue_ids.iter().any(|id| id == venue_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub venue_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub needs_venue_claim: bool,
    pub owned_venue_ids: Vec<String>,
}
