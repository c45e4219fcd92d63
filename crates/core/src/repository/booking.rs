use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{DeskError, DeskResult};
use crate::models::booking::{Booking, BookingStatus, StatusExtras};
use crate::models::range::DateRange;
use crate::store::{BookingQuery, BookingStore, ChangeFeed, Collection, SortOrder};
use crate::subscription::Subscription;

/// Upper bound on the live "upcoming bookings" snapshot.
pub const LIVE_BOOKING_LIMIT: usize = 50;

#[derive(Clone)]
pub struct BookingRepository {
    store: Arc<dyn BookingStore>,
    feed: Arc<dyn ChangeFeed>,
}

impl BookingRepository {
    pub fn new(store: Arc<dyn BookingStore>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { store, feed }
    }

    /// Bookings of a venue, oldest first inside `range`, newest first when
    /// no range is given.
    pub async fn list_bookings(
        &self,
        venue_id: &str,
        range: Option<&DateRange>,
    ) -> DeskResult<Vec<Booking>> {
        let mut query = BookingQuery::for_venue(venue_id);
        if let Some(range) = range {
            query.start_from = Some(range.start);
            query.start_until = Some(range.end);
            query.order = SortOrder::Ascending;
        }

        let bookings = self.store.query_bookings(&query).await?;
        debug!("Listed {} bookings for venue {}", bookings.len(), venue_id);
        Ok(bookings)
    }

    pub async fn get_booking(&self, booking_id: &str) -> DeskResult<Booking> {
        self.store
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| DeskError::NotFound(format!("Booking with ID {} not found", booking_id)))
    }

    pub async fn update_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
        extras: StatusExtras,
    ) -> DeskResult<Booking> {
        self.update_status_at(booking_id, status, extras, Utc::now()).await
    }

    /// Applies a status change as seen at `now`.
    ///
    /// Re-applying the current status is a no-op and writes nothing.
    pub async fn update_status_at(
        &self,
        booking_id: &str,
        status: BookingStatus,
        mut extras: StatusExtras,
        now: DateTime<Utc>,
    ) -> DeskResult<Booking> {
        let current = self.get_booking(booking_id).await?;

        if current.status == status {
            debug!("Booking {} already {}, nothing to write", booking_id, status);
            return Ok(current);
        }

        if !current.status.can_transition(status) {
            return Err(DeskError::invalid_transition(current.status, status));
        }

        if extras.no_show_fee.is_some() && status != BookingStatus::NoShow {
            return Err(DeskError::Validation(
                "A no-show fee only applies to no-show bookings".to_string(),
            ));
        }

        if extras.cancellation_reason.is_some() && status != BookingStatus::Cancelled {
            return Err(DeskError::Validation(
                "A cancellation reason only applies to cancelled bookings".to_string(),
            ));
        }

        if status == BookingStatus::NoShow && now < current.grace_deadline() {
            return Err(DeskError::Validation(format!(
                "Grace period for booking {} runs until {}",
                booking_id,
                current.grace_deadline()
            )));
        }

        if matches!(status, BookingStatus::CheckedIn | BookingStatus::InProgress)
            && current.actual_start_time.is_none()
            && extras.actual_start_time.is_none()
        {
            extras.actual_start_time = Some(now);
        }

        let updated = self
            .store
            .update_booking_status(booking_id, status, &extras)
            .await?;

        info!(
            "Booking {} moved {} -> {}",
            booking_id, current.status, updated.status
        );
        Ok(updated)
    }

    /// Streams the next [`LIVE_BOOKING_LIMIT`] upcoming bookings of a venue,
    /// soonest first, re-delivered whenever the venue's bookings change.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<F>(&self, venue_id: &str, on_change: F) -> Subscription
    where
        F: Fn(DeskResult<Vec<Booking>>) + Send + Sync + 'static,
    {
        let store = Arc::clone(&self.store);
        let venue = venue_id.to_string();

        let fetch = move || {
            let store = Arc::clone(&store);
            let query = BookingQuery {
                venue_id: venue.clone(),
                start_from: Some(Utc::now()),
                start_until: None,
                order: SortOrder::Ascending,
                limit: Some(LIVE_BOOKING_LIMIT),
            };
            async move { store.query_bookings(&query).await }
        };

        Subscription::spawn(
            self.feed.changes(),
            Collection::Bookings,
            venue_id.to_string(),
            fetch,
            Arc::new(on_change),
        )
    }
}
