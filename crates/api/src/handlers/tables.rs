use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use cuefinder_core::{
    errors::DeskError,
    models::{
        range::DateRange,
        table::{Table, UpdateTableStatusRequest},
    },
    reconcile::free_tables,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    handlers::venues::owned_venue,
    middleware::{auth::OwnerSession, error_handling::AppError},
    ApiState,
};

/// How far before the requested window bookings are scanned for overlap.
const OVERLAP_LOOKBACK_HOURS: i64 = 24;

#[derive(Debug, Deserialize)]
pub struct FreeTablesQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[axum::debug_handler]
pub async fn list_tables(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(venue_id): Path<String>,
) -> Result<Json<Vec<Table>>, AppError> {
    session.authorize_venue(&venue_id)?;
    let tables = state.tables.list_tables(&venue_id).await?;
    Ok(Json(tables))
}

/// Tables that could take a booking for `[start, end)`.
#[axum::debug_handler]
pub async fn list_free_tables(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(venue_id): Path<String>,
    Query(query): Query<FreeTablesQuery>,
) -> Result<Json<Vec<Table>>, AppError> {
    if query.end <= query.start {
        return Err(DeskError::Validation("end must be after start".to_string()).into());
    }
    let venue = owned_venue(&state, &session, &venue_id).await?;

    let scan = DateRange {
        start: query.start - Duration::hours(OVERLAP_LOOKBACK_HOURS),
        end: query.end,
    };
    let bookings = state.bookings.list_bookings(&venue.id, Some(&scan)).await?;
    let tables = state.tables.list_tables(&venue.id).await?;

    let free = free_tables(&tables, &bookings, query.start, query.end)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(free))
}

#[axum::debug_handler]
pub async fn update_table_status(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(table_id): Path<String>,
    Json(payload): Json<UpdateTableStatusRequest>,
) -> Result<Json<Table>, AppError> {
    let table = state.tables.get_table(&table_id).await?;
    session.authorize_venue(&table.venue_id)?;

    let updated = state.tables.update_status(&table_id, payload.status).await?;
    Ok(Json(updated))
}
