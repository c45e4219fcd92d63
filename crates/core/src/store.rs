//! Boundary to the document store.
//!
//! Repositories talk to storage only through these traits. Implementations
//! convert their native row and timestamp types into the domain models
//! before returning, so nothing store-specific leaks past this module.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::errors::DeskResult;
use crate::models::booking::{Booking, BookingStatus, StatusExtras};
use crate::models::table::{Table, TableStatus};
use crate::models::user::User;
use crate::models::venue::{Venue, VenueClaim};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Filter over a venue's bookings, keyed on start time.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingQuery {
    pub venue_id: String,
    pub start_from: Option<DateTime<Utc>>,
    pub start_until: Option<DateTime<Utc>>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl BookingQuery {
    pub fn for_venue(venue_id: impl Into<String>) -> Self {
        Self {
            venue_id: venue_id.into(),
            start_from: None,
            start_until: None,
            order: SortOrder::Descending,
            limit: None,
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        booking.venue_id == self.venue_id
            && self.start_from.is_none_or(|from| booking.start_time >= from)
            && self.start_until.is_none_or(|until| booking.start_time <= until)
    }

    /// Orders and truncates an already filtered set the way the query asks.
    pub fn arrange(&self, bookings: &mut Vec<Booking>) {
        match self.order {
            SortOrder::Ascending => bookings.sort_by(|a, b| a.start_time.cmp(&b.start_time)),
            SortOrder::Descending => bookings.sort_by(|a, b| b.start_time.cmp(&a.start_time)),
        }
        if let Some(limit) = self.limit {
            bookings.truncate(limit);
        }
    }
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn query_bookings(&self, query: &BookingQuery) -> DeskResult<Vec<Booking>>;

    async fn get_booking(&self, id: &str) -> DeskResult<Option<Booking>>;

    /// Writes the status and extras and stamps `updated_at` with the
    /// store's clock. Returns the stored record.
    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
        extras: &StatusExtras,
    ) -> DeskResult<Booking>;
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Tables of a venue ordered by table number.
    async fn query_tables(&self, venue_id: &str) -> DeskResult<Vec<Table>>;

    async fn get_table(&self, id: &str) -> DeskResult<Option<Table>>;

    async fn update_table_status(
        &self,
        id: &str,
        status: TableStatus,
        current_booking_id: Option<&str>,
    ) -> DeskResult<Table>;
}

#[async_trait]
pub trait VenueStore: Send + Sync {
    /// Active venues ordered by name.
    async fn list_active_venues(&self, limit: usize) -> DeskResult<Vec<Venue>>;

    async fn get_venue(&self, id: &str) -> DeskResult<Option<Venue>>;

    /// Sets the owner fields only while the venue is unowned and adds the
    /// venue to the claimant's owned set, as one unit.
    ///
    /// Fails with `NotFound` for an unknown venue and `AlreadyClaimed` when
    /// an owner is already recorded.
    async fn claim_venue(&self, id: &str, claim: &VenueClaim) -> DeskResult<Venue>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: &str) -> DeskResult<Option<User>>;

    async fn put_user(&self, user: &User) -> DeskResult<User>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Bookings,
    Tables,
    Venues,
    Users,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Bookings => "bookings",
            Collection::Tables => "tables",
            Collection::Venues => "venues",
            Collection::Users => "users",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bookings" => Some(Collection::Bookings),
            "tables" => Some(Collection::Tables),
            "venues" => Some(Collection::Venues),
            "users" => Some(Collection::Users),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document in `collection` belonging to `venue_id` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub venue_id: String,
}

impl ChangeEvent {
    pub fn new(collection: Collection, venue_id: impl Into<String>) -> Self {
        Self {
            collection,
            venue_id: venue_id.into(),
        }
    }

    /// Wire form used by the change notification channel.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.collection, self.venue_id)
    }

    pub fn decode(payload: &str) -> Option<Self> {
        let (collection, venue_id) = payload.split_once(':')?;
        Some(Self::new(Collection::parse(collection)?, venue_id))
    }
}

/// Push side of the store. Every receiver sees changes in commit order.
pub trait ChangeFeed: Send + Sync {
    fn changes(&self) -> broadcast::Receiver<ChangeEvent>;
}
