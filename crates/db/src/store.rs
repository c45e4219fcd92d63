//! Postgres implementation of the store traits.

use async_trait::async_trait;
use cuefinder_core::errors::{DeskError, DeskResult};
use cuefinder_core::models::booking::{Booking, BookingStatus, StatusExtras};
use cuefinder_core::models::table::{Table, TableStatus};
use cuefinder_core::models::user::User;
use cuefinder_core::models::venue::{Venue, VenueClaim};
use cuefinder_core::store::{
    BookingQuery, BookingStore, ChangeEvent, ChangeFeed, TableStore, UserStore, VenueStore,
};
use eyre::Result;
use tokio::sync::broadcast;
use tracing::warn;

use crate::auth::{Credential, CredentialStore};
use crate::listener::spawn_change_listener;
use crate::models::{ClaimOutcome, DbUser};
use crate::repositories::{booking, credential, table, user, venue};
use crate::DbPool;

const CHANGE_BUFFER: usize = 256;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl PgStore {
    /// Connects the change feed to Postgres notifications.
    pub async fn connect(pool: DbPool) -> Result<Self> {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        spawn_change_listener(&pool, changes.clone()).await?;
        Ok(Self { pool, changes })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Converts rows, dropping the ones that do not parse. A single bad row
/// must not hide the rest of the venue.
fn convert_rows<R, T>(rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = DeskError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("Skipping unreadable row: {}", err);
                None
            }
        })
        .collect()
}

#[async_trait]
impl BookingStore for PgStore {
    async fn query_bookings(&self, query: &BookingQuery) -> DeskResult<Vec<Booking>> {
        let rows = booking::query_bookings(&self.pool, query).await?;
        Ok(convert_rows(rows))
    }

    async fn get_booking(&self, id: &str) -> DeskResult<Option<Booking>> {
        booking::get_booking_by_id(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
        extras: &StatusExtras,
    ) -> DeskResult<Booking> {
        booking::update_booking_status(&self.pool, id, status.as_str(), extras)
            .await?
            .ok_or_else(|| DeskError::NotFound(format!("Booking with ID {} not found", id)))?
            .try_into()
    }
}

#[async_trait]
impl TableStore for PgStore {
    async fn query_tables(&self, venue_id: &str) -> DeskResult<Vec<Table>> {
        let rows = table::get_tables_by_venue_id(&self.pool, venue_id).await?;
        Ok(convert_rows(rows))
    }

    async fn get_table(&self, id: &str) -> DeskResult<Option<Table>> {
        table::get_table_by_id(&self.pool, id)
            .await?
            .map(Table::try_from)
            .transpose()
    }

    async fn update_table_status(
        &self,
        id: &str,
        status: TableStatus,
        current_booking_id: Option<&str>,
    ) -> DeskResult<Table> {
        table::update_table_status(&self.pool, id, status.as_str(), current_booking_id)
            .await?
            .ok_or_else(|| DeskError::NotFound(format!("Table with ID {} not found", id)))?
            .try_into()
    }
}

#[async_trait]
impl VenueStore for PgStore {
    async fn list_active_venues(&self, limit: usize) -> DeskResult<Vec<Venue>> {
        let rows = venue::list_active_venues(&self.pool, limit).await?;
        Ok(convert_rows(rows))
    }

    async fn get_venue(&self, id: &str) -> DeskResult<Option<Venue>> {
        venue::get_venue_by_id(&self.pool, id)
            .await?
            .map(Venue::try_from)
            .transpose()
    }

    async fn claim_venue(&self, id: &str, claim: &VenueClaim) -> DeskResult<Venue> {
        match venue::claim_venue(&self.pool, id, claim).await? {
            ClaimOutcome::Claimed(row) => row.try_into(),
            ClaimOutcome::AlreadyClaimed => Err(DeskError::AlreadyClaimed(id.to_string())),
            ClaimOutcome::NotFound => Err(DeskError::NotFound(format!("Venue with ID {} not found", id))),
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user(&self, id: &str) -> DeskResult<Option<User>> {
        user::get_user_by_id(&self.pool, id)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn put_user(&self, profile: &User) -> DeskResult<User> {
        let row = DbUser {
            id: profile.id.clone(),
            email: profile.email.clone(),
            display_name: profile.display_name.clone(),
            role: profile.role.as_str().to_string(),
            owned_venue_ids: profile.owned_venue_ids.clone(),
            created_at: profile.created_at,
        };
        user::upsert_user(&self.pool, &row).await?.try_into()
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn insert_credential(&self, entry: &Credential) -> DeskResult<Option<Credential>> {
        let stored = credential::create_credential(
            &self.pool,
            &entry.email,
            &entry.user_id,
            &entry.password_hash,
        )
        .await?;

        Ok(stored.map(|row| Credential {
            user_id: row.user_id,
            email: row.email,
            password_hash: row.password_hash,
        }))
    }

    async fn find_credential(&self, email: &str) -> DeskResult<Option<Credential>> {
        let row = credential::get_credential_by_email(&self.pool, email).await?;
        Ok(row.map(|row| Credential {
            user_id: row.user_id,
            email: row.email,
            password_hash: row.password_hash,
        }))
    }
}

impl ChangeFeed for PgStore {
    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
