use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use cuefinder_core::{
    errors::DeskResult,
    models::{
        booking::{Booking, ListBookingsQuery, UpdateBookingStatusRequest},
        range::DateRange,
    },
};
use futures::{stream, Stream};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    handlers::venues::owned_venue,
    middleware::{auth::OwnerSession, error_handling::AppError},
    ApiState,
};

/// Bookings of a venue. With `?date=YYYY-MM-DD` only bookings starting on
/// that local day are returned, oldest first; otherwise all of them,
/// newest first.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(venue_id): Path<String>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let venue = owned_venue(&state, &session, &venue_id).await?;

    let range = match query.date {
        Some(date) => Some(DateRange::for_day(date, state.timezone_for(&venue))?),
        None => None,
    };

    let bookings = state.bookings.list_bookings(&venue.id, range.as_ref()).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.get_booking(&booking_id).await?;
    session.authorize_venue(&booking.venue_id)?;
    Ok(Json(booking))
}

/// Server-sent events carrying the upcoming bookings snapshot. A fresh
/// `bookings` event follows every change to the venue's bookings; the
/// subscription ends when the client disconnects.
#[axum::debug_handler]
pub async fn live_bookings(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(venue_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    session.authorize_venue(&venue_id)?;

    let (tx, rx) = mpsc::unbounded_channel::<DeskResult<Vec<Booking>>>();
    let subscription = state.bookings.subscribe(&venue_id, move |snapshot| {
        // The receiver is gone once the client disconnects.
        let _ = tx.send(snapshot);
    });
    debug!("Live bookings stream opened for venue {}", venue_id);

    // The stream owns the subscription, so dropping the response
    // unsubscribes.
    let events = stream::unfold((rx, subscription), |(mut rx, subscription)| async move {
        let snapshot = rx.recv().await?;
        let event = match snapshot {
            Ok(bookings) => Event::default().event("bookings").json_data(&bookings),
            Err(err) => Ok(Event::default().event("error").data(err.to_string())),
        };
        Some((event, (rx, subscription)))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.get_booking(&booking_id).await?;
    session.authorize_venue(&booking.venue_id)?;

    let updated = state
        .bookings
        .update_status(&booking_id, payload.status, payload.extras())
        .await?;
    Ok(Json(updated))
}
