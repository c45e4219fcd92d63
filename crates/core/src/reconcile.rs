//! Occupancy and analytics derived from a bookings + tables snapshot.
//!
//! Everything here is a pure function of its inputs. Snapshots may arrive
//! from independent subscriptions and be momentarily out of step with each
//! other; the reconciler only ever produces a best-effort view and never
//! fails the whole pass because of one bad record.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::DeskError;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::range::DateRange;
use crate::models::table::Table;

/// Number of hours reported in [`Reconciliation::peak_hours`].
pub const PEAK_HOUR_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedBooking {
    pub booking_id: String,
    pub reason: String,
}

/// Two live bookings claiming the same table for overlapping intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConflict {
    pub table_id: String,
    pub first_booking_id: String,
    pub second_booking_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub as_of: DateTime<Utc>,
    pub occupied_table_ids: BTreeSet<String>,
    /// Table id -> id of the booking holding it.
    pub occupying_bookings: BTreeMap<String, String>,
    pub revenue: Decimal,
    pub booking_count: usize,
    pub utilization_pct: u8,
    pub peak_hours: Vec<u32>,
    pub avg_party_size: f64,
    pub avg_duration: i64,
    pub active_tables: usize,
    pub total_tables: usize,
    pub excluded: Vec<ExcludedBooking>,
    pub conflicts: Vec<BookingConflict>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    timezone: Tz,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Reconciler {
    /// `timezone` decides the local hour and day a booking falls into.
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn reconcile(
        &self,
        bookings: &[Booking],
        tables: &[Table],
        as_of: DateTime<Utc>,
    ) -> Reconciliation {
        let (valid, excluded) = split_malformed(bookings);

        let active: BTreeSet<&str> = tables
            .iter()
            .filter(|table| table.is_active)
            .map(|table| table.id.as_str())
            .collect();

        // In-progress bookings claim first, then the earliest start.
        let mut occupying: Vec<&Booking> = valid
            .iter()
            .copied()
            .filter(|booking| occupies_at(booking, as_of))
            .collect();
        occupying.sort_by(|a, b| {
            (a.status != BookingStatus::InProgress, a.start_time, &a.id).cmp(&(
                b.status != BookingStatus::InProgress,
                b.start_time,
                &b.id,
            ))
        });

        let mut occupying_bookings = BTreeMap::new();
        for booking in occupying {
            for table_id in &booking.table_ids {
                if active.contains(table_id.as_str()) {
                    occupying_bookings
                        .entry(table_id.clone())
                        .or_insert_with(|| booking.id.clone());
                }
            }
        }
        let occupied_table_ids: BTreeSet<String> = occupying_bookings.keys().cloned().collect();

        let billable: Vec<&Booking> = valid
            .iter()
            .copied()
            .filter(|booking| booking.status.is_billable())
            .collect();

        let conflicts = find_conflicts(&valid);
        for conflict in &conflicts {
            warn!(
                "Bookings {} and {} both claim table {}",
                conflict.first_booking_id, conflict.second_booking_id, conflict.table_id
            );
        }

        Reconciliation {
            as_of,
            utilization_pct: utilization(occupied_table_ids.len(), active.len()),
            occupied_table_ids,
            occupying_bookings,
            revenue: billable.iter().map(|booking| booking.total_cost).sum(),
            booking_count: billable.len(),
            peak_hours: self.peak_hours(&billable),
            avg_party_size: avg_party_size(&billable),
            avg_duration: avg_duration(&billable),
            active_tables: active.len(),
            total_tables: tables.len(),
            excluded,
            conflicts,
        }
    }

    /// Revenue per local day of `range`, oldest first. Days without
    /// billable bookings report zero.
    pub fn daily_revenue(&self, bookings: &[Booking], range: &DateRange) -> Vec<DailyRevenue> {
        let (valid, _) = split_malformed(bookings);

        let mut per_day: HashMap<NaiveDate, Decimal> = HashMap::new();
        for booking in valid
            .into_iter()
            .filter(|booking| booking.status.is_billable() && range.contains(booking.start_time))
        {
            let day = booking.start_time.with_timezone(&self.timezone).date_naive();
            *per_day.entry(day).or_default() += booking.total_cost;
        }

        range
            .local_days(self.timezone)
            .into_iter()
            .map(|date| DailyRevenue {
                date,
                revenue: per_day.get(&date).copied().unwrap_or_default(),
            })
            .collect()
    }

    fn peak_hours(&self, billable: &[&Booking]) -> Vec<u32> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for booking in billable {
            let hour = booking.start_time.with_timezone(&self.timezone).hour();
            *counts.entry(hour).or_default() += 1;
        }

        let mut ranked: Vec<(u32, usize)> = counts.into_iter().collect();
        ranked.sort_by(|(hour_a, count_a), (hour_b, count_b)| {
            count_b.cmp(count_a).then(hour_a.cmp(hour_b))
        });
        ranked
            .into_iter()
            .take(PEAK_HOUR_COUNT)
            .map(|(hour, _)| hour)
            .collect()
    }
}

/// Tables that can take a new booking for `[start, end)`: bookable and not
/// claimed by any open booking in that interval.
pub fn free_tables<'a>(
    tables: &'a [Table],
    bookings: &[Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&'a Table> {
    let claimed: BTreeSet<&str> = bookings
        .iter()
        .filter(|booking| !booking.status.is_terminal() && booking.overlaps(start, end))
        .flat_map(|booking| booking.table_ids.iter().map(String::as_str))
        .collect();

    tables
        .iter()
        .filter(|table| table.is_bookable() && !claimed.contains(table.id.as_str()))
        .collect()
}

fn split_malformed(bookings: &[Booking]) -> (Vec<&Booking>, Vec<ExcludedBooking>) {
    let mut valid = Vec::with_capacity(bookings.len());
    let mut excluded = Vec::new();

    for booking in bookings {
        match booking.validate() {
            Ok(()) => valid.push(booking),
            Err(DeskError::MalformedBooking { id, reason }) => {
                warn!("Excluding malformed booking {}: {}", id, reason);
                excluded.push(ExcludedBooking {
                    booking_id: id,
                    reason,
                });
            }
            Err(other) => {
                warn!("Excluding booking {}: {}", booking.id, other);
                excluded.push(ExcludedBooking {
                    booking_id: booking.id.clone(),
                    reason: other.to_string(),
                });
            }
        }
    }

    (valid, excluded)
}

fn occupies_at(booking: &Booking, as_of: DateTime<Utc>) -> bool {
    match booking.status {
        BookingStatus::InProgress => true,
        BookingStatus::Confirmed | BookingStatus::CheckedIn => booking.covers(as_of),
        _ => false,
    }
}

fn utilization(occupied: usize, active: usize) -> u8 {
    if active == 0 {
        return 0;
    }
    let pct = (100.0 * occupied.min(active) as f64 / active as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

fn avg_party_size(billable: &[&Booking]) -> f64 {
    if billable.is_empty() {
        return 0.0;
    }
    let total: u64 = billable.iter().map(|booking| u64::from(booking.party_size)).sum();
    let mean = total as f64 / billable.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn avg_duration(billable: &[&Booking]) -> i64 {
    if billable.is_empty() {
        return 0;
    }
    let total: i64 = billable.iter().map(|booking| booking.duration_minutes()).sum();
    (total as f64 / billable.len() as f64).round() as i64
}

fn find_conflicts(bookings: &[&Booking]) -> Vec<BookingConflict> {
    let mut by_table: BTreeMap<&str, Vec<&Booking>> = BTreeMap::new();
    for booking in bookings
        .iter()
        .copied()
        .filter(|booking| booking.status.holds_tables())
    {
        for table_id in &booking.table_ids {
            by_table.entry(table_id.as_str()).or_default().push(booking);
        }
    }

    let mut conflicts = Vec::new();
    for (table_id, mut claims) in by_table {
        claims.sort_by(|a, b| (a.start_time, &a.id).cmp(&(b.start_time, &b.id)));
        for (i, first) in claims.iter().enumerate() {
            for second in claims[i + 1..]
                .iter()
                .take_while(|second| second.start_time < first.end_time)
            {
                conflicts.push(BookingConflict {
                    table_id: table_id.to_string(),
                    first_booking_id: first.id.clone(),
                    second_booking_id: second.id.clone(),
                });
            }
        }
    }
    conflicts
}
