//! In-process store used for demo mode and tests.
//!
//! Every write happens under one lock and publishes a [`ChangeEvent`]
//! after the lock is released.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use cuefinder_core::errors::{DeskError, DeskResult};
use cuefinder_core::models::booking::{Booking, BookingStatus, StatusExtras};
use cuefinder_core::models::table::{Table, TableStatus};
use cuefinder_core::models::user::User;
use cuefinder_core::models::venue::{Venue, VenueClaim};
use cuefinder_core::store::{
    BookingQuery, BookingStore, ChangeEvent, ChangeFeed, Collection, TableStore, UserStore,
    VenueStore,
};
use tokio::sync::broadcast;

use crate::auth::{Credential, CredentialStore};

const CHANGE_BUFFER: usize = 256;

#[derive(Default)]
struct MemoryState {
    venues: BTreeMap<String, Venue>,
    tables: BTreeMap<String, Table>,
    bookings: BTreeMap<String, Booking>,
    users: BTreeMap<String, User>,
    credentials: BTreeMap<String, Credential>,
}

pub struct MemoryStore {
    state: RwLock<MemoryState>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric table numbers first in numeric order, then the rest by text.
fn table_order(a: &Table, b: &Table) -> Ordering {
    let key = |t: &Table| match t.number.parse::<u32>() {
        Ok(n) => (0, n),
        Err(_) => (1, 0),
    };
    key(a).cmp(&key(b)).then_with(|| a.number.cmp(&b.number))
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            state: RwLock::new(MemoryState::default()),
            changes,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, collection: Collection, venue_id: &str) {
        // Nobody listening is fine.
        let _ = self.changes.send(ChangeEvent::new(collection, venue_id));
    }

    pub fn insert_venue(&self, venue: Venue) {
        let venue_id = venue.id.clone();
        self.write().venues.insert(venue_id.clone(), venue);
        self.publish(Collection::Venues, &venue_id);
    }

    pub fn insert_table(&self, table: Table) {
        let venue_id = table.venue_id.clone();
        self.write().tables.insert(table.id.clone(), table);
        self.publish(Collection::Tables, &venue_id);
    }

    /// Stores the booking as given, without validating it.
    pub fn insert_booking(&self, booking: Booking) {
        let venue_id = booking.venue_id.clone();
        self.write().bookings.insert(booking.id.clone(), booking);
        self.publish(Collection::Bookings, &venue_id);
    }

    pub fn insert_user(&self, user: User) {
        self.write().users.insert(user.id.clone(), user);
    }

    pub fn insert_credential(&self, credential: Credential) {
        self.write()
            .credentials
            .insert(credential.email.clone(), credential);
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn query_bookings(&self, query: &BookingQuery) -> DeskResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .read()
            .bookings
            .values()
            .filter(|booking| query.matches(booking))
            .cloned()
            .collect();
        query.arrange(&mut bookings);
        Ok(bookings)
    }

    async fn get_booking(&self, id: &str) -> DeskResult<Option<Booking>> {
        Ok(self.read().bookings.get(id).cloned())
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
        extras: &StatusExtras,
    ) -> DeskResult<Booking> {
        let updated = {
            let mut state = self.write();
            let booking = state
                .bookings
                .get_mut(id)
                .ok_or_else(|| DeskError::NotFound(format!("Booking with ID {} not found", id)))?;

            booking.status = status;
            if let Some(reason) = &extras.cancellation_reason {
                booking.cancellation_reason = Some(reason.clone());
            }
            if let Some(fee) = extras.no_show_fee {
                booking.no_show_fee = Some(fee);
            }
            if let Some(started) = extras.actual_start_time {
                booking.actual_start_time = Some(started);
            }
            booking.updated_at = Utc::now();
            booking.clone()
        };

        self.publish(Collection::Bookings, &updated.venue_id);
        Ok(updated)
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn query_tables(&self, venue_id: &str) -> DeskResult<Vec<Table>> {
        let mut tables: Vec<Table> = self
            .read()
            .tables
            .values()
            .filter(|table| table.venue_id == venue_id)
            .cloned()
            .collect();
        tables.sort_by(table_order);
        Ok(tables)
    }

    async fn get_table(&self, id: &str) -> DeskResult<Option<Table>> {
        Ok(self.read().tables.get(id).cloned())
    }

    async fn update_table_status(
        &self,
        id: &str,
        status: TableStatus,
        current_booking_id: Option<&str>,
    ) -> DeskResult<Table> {
        let updated = {
            let mut state = self.write();
            let table = state
                .tables
                .get_mut(id)
                .ok_or_else(|| DeskError::NotFound(format!("Table with ID {} not found", id)))?;
            table.status = status;
            table.current_booking_id = current_booking_id.map(str::to_string);
            table.clone()
        };

        self.publish(Collection::Tables, &updated.venue_id);
        Ok(updated)
    }
}

#[async_trait]
impl VenueStore for MemoryStore {
    async fn list_active_venues(&self, limit: usize) -> DeskResult<Vec<Venue>> {
        let mut venues: Vec<Venue> = self
            .read()
            .venues
            .values()
            .filter(|venue| venue.is_active)
            .cloned()
            .collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        venues.truncate(limit);
        Ok(venues)
    }

    async fn get_venue(&self, id: &str) -> DeskResult<Option<Venue>> {
        Ok(self.read().venues.get(id).cloned())
    }

    async fn claim_venue(&self, id: &str, claim: &VenueClaim) -> DeskResult<Venue> {
        let claimed = {
            let mut state = self.write();
            let venue = state
                .venues
                .get_mut(id)
                .ok_or_else(|| DeskError::NotFound(format!("Venue with ID {} not found", id)))?;
            if venue.is_claimed() {
                return Err(DeskError::AlreadyClaimed(id.to_string()));
            }

            venue.owner_id = Some(claim.user_id.clone());
            venue.owner_email = Some(claim.user_email.clone());
            venue.verification_status = Some(claim.verification_status);
            venue.claimed_at = Some(claim.claimed_at);
            venue.booking_enabled = true;
            let claimed = venue.clone();

            if let Some(user) = state.users.get_mut(&claim.user_id) {
                if !user.owns(id) {
                    user.owned_venue_ids.push(id.to_string());
                }
            }
            claimed
        };

        self.publish(Collection::Venues, id);
        Ok(claimed)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: &str) -> DeskResult<Option<User>> {
        Ok(self.read().users.get(id).cloned())
    }

    async fn put_user(&self, user: &User) -> DeskResult<User> {
        self.write().users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_credential(&self, credential: &Credential) -> DeskResult<Option<Credential>> {
        let mut state = self.write();
        if state.credentials.contains_key(&credential.email) {
            return Ok(None);
        }
        state
            .credentials
            .insert(credential.email.clone(), credential.clone());
        Ok(Some(credential.clone()))
    }

    async fn find_credential(&self, email: &str) -> DeskResult<Option<Credential>> {
        Ok(self.read().credentials.get(email).cloned())
    }
}

impl ChangeFeed for MemoryStore {
    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
