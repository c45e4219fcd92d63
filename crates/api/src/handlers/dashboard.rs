use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use cuefinder_core::{
    models::{booking::Booking, range::DateRange, table::Table, venue::Venue},
    reconcile::{DailyRevenue, Reconciler, Reconciliation},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::{
    handlers::venues::owned_venue,
    middleware::{auth::OwnerSession, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub venue: Venue,
    pub stats: Reconciliation,
    pub tables: Vec<Table>,
    pub bookings: Vec<Booking>,
    /// Tables whose occupancy was rewritten by this refresh.
    pub updated_tables: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsRange {
    #[default]
    Week,
    Month,
}

impl AnalyticsRange {
    pub fn days(self) -> u32 {
        match self {
            AnalyticsRange::Week => 7,
            AnalyticsRange::Month => 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub range: AnalyticsRange,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub range: AnalyticsRange,
    pub period: DateRange,
    pub daily_revenue: Vec<DailyRevenue>,
    pub total_revenue: Decimal,
    pub booking_count: usize,
    pub avg_party_size: f64,
    pub avg_duration: i64,
    pub peak_hours: Vec<u32>,
}

/// Today's bookings and tables, with table occupancy reconciled against
/// the bookings before the response is built.
#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(venue_id): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let venue = owned_venue(&state, &session, &venue_id).await?;
    let timezone = state.timezone_for(&venue);
    let now = Utc::now();

    let today = DateRange::for_day(now.with_timezone(&timezone).date_naive(), timezone)?;
    let bookings = state.bookings.list_bookings(&venue.id, Some(&today)).await?;
    let mut tables = state.tables.list_tables(&venue.id).await?;

    let stats = Reconciler::new(timezone).reconcile(&bookings, &tables, now);
    let changed = state.tables.apply_occupancy(&venue.id, &stats).await?;
    if !changed.is_empty() {
        info!(
            "Dashboard refresh updated {} tables at venue {}",
            changed.len(),
            venue.id
        );
    }

    let updated_tables = changed.len();
    for updated in changed {
        if let Some(slot) = tables.iter_mut().find(|table| table.id == updated.id) {
            *slot = updated;
        }
    }

    Ok(Json(DashboardResponse {
        venue,
        stats,
        tables,
        bookings,
        updated_tables,
    }))
}

#[axum::debug_handler]
pub async fn analytics(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(venue_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let venue = owned_venue(&state, &session, &venue_id).await?;
    let timezone = state.timezone_for(&venue);
    let now = Utc::now();

    let today = now.with_timezone(&timezone).date_naive();
    let period = DateRange::trailing_days(today, query.range.days(), timezone)?;
    let bookings = state.bookings.list_bookings(&venue.id, Some(&period)).await?;
    let tables = state.tables.list_tables(&venue.id).await?;

    let reconciler = Reconciler::new(timezone);
    let summary = reconciler.reconcile(&bookings, &tables, now);

    Ok(Json(AnalyticsResponse {
        range: query.range,
        period,
        daily_revenue: reconciler.daily_revenue(&bookings, &period),
        total_revenue: summary.revenue,
        booking_count: summary.booking_count,
        avg_party_size: summary.avg_party_size,
        avg_duration: summary.avg_duration,
        peak_hours: summary.peak_hours,
    }))
}
