use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{DeskError, DeskResult};

/// Grace period applied when a booking does not carry its own.
pub const DEFAULT_GRACE_PERIOD_MINUTES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 7] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::CheckedIn => "Checked In",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::NoShow => "No Show",
        }
    }

    /// Badge color used by the dashboard.
    pub fn color(self) -> &'static str {
        match self {
            BookingStatus::Pending => "orange",
            BookingStatus::Confirmed => "green",
            BookingStatus::CheckedIn | BookingStatus::InProgress => "blue",
            BookingStatus::Completed => "gray",
            BookingStatus::Cancelled | BookingStatus::NoShow => "red",
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }

    /// Statuses reachable from `self` in one step.
    pub fn next_statuses(self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            // Check-in is optional for a confirmed party.
            Confirmed => &[CheckedIn, InProgress, Cancelled, NoShow],
            CheckedIn => &[InProgress, Completed, Cancelled, NoShow],
            InProgress => &[Completed],
            Completed | Cancelled | NoShow => &[],
        }
    }

    pub fn can_transition(self, next: BookingStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    /// Whether a booking in this status contributes revenue and analytics.
    pub fn is_billable(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Completed)
    }

    /// Whether a booking in this status still holds its tables.
    pub fn holds_tables(self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::NoShow)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DeskError::Validation(format!("Unknown booking status: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub venue_id: String,
    pub user_id: String,
    pub table_ids: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub party_size: u32,
    pub status: BookingStatus,
    pub total_cost: Decimal,
    pub deposit_amount: Option<Decimal>,
    pub confirmation_code: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub special_requests: Vec<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub cancellation_reason: Option<String>,
    pub no_show_fee: Option<Decimal>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub grace_period_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Checks the record-level invariants the reconciler relies on.
    pub fn validate(&self) -> DeskResult<()> {
        if self.end_time <= self.start_time {
            return Err(DeskError::malformed(&self.id, "end time is not after start time"));
        }
        if self.table_ids.is_empty() {
            return Err(DeskError::malformed(&self.id, "no tables assigned"));
        }
        if self.party_size == 0 {
            return Err(DeskError::malformed(&self.id, "party size must be positive"));
        }
        if self.total_cost < Decimal::ZERO {
            return Err(DeskError::malformed(&self.id, "total cost is negative"));
        }
        Ok(())
    }

    /// `[start, end)` contains `at`.
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        self.start_time <= at && at < self.end_time
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Moment after which an unattended booking may be marked a no-show.
    pub fn grace_deadline(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(i64::from(self.grace_period_minutes))
    }
}

/// Additional fields persisted alongside a status change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusExtras {
    pub cancellation_reason: Option<String>,
    pub no_show_fee: Option<Decimal>,
    pub actual_start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    pub cancellation_reason: Option<String>,
    pub no_show_fee: Option<Decimal>,
}

impl UpdateBookingStatusRequest {
    pub fn extras(&self) -> StatusExtras {
        StatusExtras {
            cancellation_reason: self.cancellation_reason.clone(),
            no_show_fee: self.no_show_fee,
            actual_start_time: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBookingsQuery {
    pub date: Option<NaiveDate>,
}
