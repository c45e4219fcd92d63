use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(VerificationStatus::Pending),
            "verified" => Some(VerificationStatus::Verified),
            "rejected" => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub venue_type: String,
    pub table_count: u32,
    pub price_per_hour: Option<Decimal>,
    pub booking_enabled: bool,
    pub is_active: bool,
    pub owner_id: Option<String>,
    pub owner_email: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub verification_status: Option<VerificationStatus>,
    pub timezone: String,
}

impl Venue {
    pub fn is_claimed(&self) -> bool {
        self.owner_id.is_some()
    }
}

/// How a fresh claim is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimPolicy {
    #[default]
    AutoVerify,
    Review,
}

impl ClaimPolicy {
    pub fn verification_status(self) -> VerificationStatus {
        match self {
            ClaimPolicy::AutoVerify => VerificationStatus::Verified,
            ClaimPolicy::Review => VerificationStatus::Pending,
        }
    }
}

/// Owner fields written in one step when a venue is claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueClaim {
    pub user_id: String,
    pub user_email: String,
    pub verification_status: VerificationStatus,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueSearchQuery {
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimVenueResponse {
    pub venue_id: String,
    pub owner_id: String,
    pub verification_status: VerificationStatus,
}
