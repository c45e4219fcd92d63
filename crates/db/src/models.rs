use chrono::{DateTime, Utc};
use cuefinder_core::errors::DeskError;
use cuefinder_core::models::booking::Booking;
use cuefinder_core::models::table::Table;
use cuefinder_core::models::user::{User, UserRole};
use cuefinder_core::models::venue::{Venue, VerificationStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: String,
    pub venue_id: String,
    pub user_id: String,
    pub table_ids: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub party_size: i32,
    pub status: String,
    pub total_cost: Decimal,
    pub deposit_amount: Option<Decimal>,
    pub confirmation_code: String,
    pub notes: Option<String>,
    pub special_requests: Vec<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub cancellation_reason: Option<String>,
    pub no_show_fee: Option<Decimal>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub grace_period_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTable {
    pub id: String,
    pub venue_id: String,
    pub number: String,
    pub size: String,
    pub table_type: String,
    pub hourly_rate: Decimal,
    pub is_active: bool,
    pub maintenance_status: String,
    pub status: String,
    pub current_booking_id: Option<String>,
    pub features: Vec<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVenue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub venue_type: String,
    pub table_count: i32,
    pub price_per_hour: Option<Decimal>,
    pub booking_enabled: bool,
    pub is_active: bool,
    pub owner_id: Option<String>,
    pub owner_email: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub verification_status: Option<String>,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub owned_venue_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCredential {
    pub email: String,
    pub user_id: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Result of the guarded claim update.
#[derive(Debug, Clone)]
pub enum ClaimOutcome {
    Claimed(DbVenue),
    AlreadyClaimed,
    NotFound,
}

// Rows are only trusted after their text columns parse into the domain
// vocabularies.

impl TryFrom<DbBooking> for Booking {
    type Error = DeskError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| DeskError::malformed(&row.id, format!("unknown status {}", row.status)))?;
        let party_size = u32::try_from(row.party_size)
            .map_err(|_| DeskError::malformed(&row.id, "negative party size"))?;
        let grace_period_minutes = u32::try_from(row.grace_period_minutes)
            .map_err(|_| DeskError::malformed(&row.id, "negative grace period"))?;

        Ok(Booking {
            id: row.id,
            venue_id: row.venue_id,
            user_id: row.user_id,
            table_ids: row.table_ids,
            start_time: row.start_time,
            end_time: row.end_time,
            party_size,
            status,
            total_cost: row.total_cost,
            deposit_amount: row.deposit_amount,
            confirmation_code: row.confirmation_code,
            notes: row.notes,
            special_requests: row.special_requests,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            cancellation_reason: row.cancellation_reason,
            no_show_fee: row.no_show_fee,
            actual_start_time: row.actual_start_time,
            grace_period_minutes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&Booking> for DbBooking {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            venue_id: booking.venue_id.clone(),
            user_id: booking.user_id.clone(),
            table_ids: booking.table_ids.clone(),
            start_time: booking.start_time,
            end_time: booking.end_time,
            party_size: i32::try_from(booking.party_size).unwrap_or(i32::MAX),
            status: booking.status.as_str().to_string(),
            total_cost: booking.total_cost,
            deposit_amount: booking.deposit_amount,
            confirmation_code: booking.confirmation_code.clone(),
            notes: booking.notes.clone(),
            special_requests: booking.special_requests.clone(),
            customer_name: booking.customer_name.clone(),
            customer_phone: booking.customer_phone.clone(),
            customer_email: booking.customer_email.clone(),
            cancellation_reason: booking.cancellation_reason.clone(),
            no_show_fee: booking.no_show_fee,
            actual_start_time: booking.actual_start_time,
            grace_period_minutes: i32::try_from(booking.grace_period_minutes).unwrap_or(i32::MAX),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

impl TryFrom<DbTable> for Table {
    type Error = DeskError;

    fn try_from(row: DbTable) -> Result<Self, Self::Error> {
        Ok(Table {
            size: row.size.parse()?,
            table_type: row.table_type.parse()?,
            maintenance_status: row.maintenance_status.parse()?,
            status: row.status.parse()?,
            id: row.id,
            venue_id: row.venue_id,
            number: row.number,
            hourly_rate: row.hourly_rate,
            is_active: row.is_active,
            current_booking_id: row.current_booking_id,
            features: row.features,
            location: row.location,
        })
    }
}

impl From<&Table> for DbTable {
    fn from(table: &Table) -> Self {
        Self {
            id: table.id.clone(),
            venue_id: table.venue_id.clone(),
            number: table.number.clone(),
            size: table.size.as_str().to_string(),
            table_type: table.table_type.as_str().to_string(),
            hourly_rate: table.hourly_rate,
            is_active: table.is_active,
            maintenance_status: table.maintenance_status.as_str().to_string(),
            status: table.status.as_str().to_string(),
            current_booking_id: table.current_booking_id.clone(),
            features: table.features.clone(),
            location: table.location.clone(),
        }
    }
}

impl TryFrom<DbVenue> for Venue {
    type Error = DeskError;

    fn try_from(row: DbVenue) -> Result<Self, Self::Error> {
        let verification_status = match row.verification_status.as_deref() {
            None => None,
            Some(text) => Some(VerificationStatus::parse(text).ok_or_else(|| {
                DeskError::Validation(format!("Unknown verification status: {}", text))
            })?),
        };

        Ok(Venue {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            email: row.email,
            website: row.website,
            venue_type: row.venue_type,
            table_count: u32::try_from(row.table_count).unwrap_or(0),
            price_per_hour: row.price_per_hour,
            booking_enabled: row.booking_enabled,
            is_active: row.is_active,
            owner_id: row.owner_id,
            owner_email: row.owner_email,
            claimed_at: row.claimed_at,
            verification_status,
            timezone: row.timezone,
        })
    }
}

impl From<&Venue> for DbVenue {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id.clone(),
            name: venue.name.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            email: venue.email.clone(),
            website: venue.website.clone(),
            venue_type: venue.venue_type.clone(),
            table_count: i32::try_from(venue.table_count).unwrap_or(i32::MAX),
            price_per_hour: venue.price_per_hour,
            booking_enabled: venue.booking_enabled,
            is_active: venue.is_active,
            owner_id: venue.owner_id.clone(),
            owner_email: venue.owner_email.clone(),
            claimed_at: venue.claimed_at,
            verification_status: venue
                .verification_status
                .map(|status| status.as_str().to_string()),
            timezone: venue.timezone.clone(),
        }
    }
}

impl TryFrom<DbUser> for User {
    type Error = DeskError;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            role: UserRole::parse(&row.role)?,
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            owned_venue_ids: row.owned_venue_ids,
            created_at: row.created_at,
        })
    }
}
