use crate::models::DbBooking;
use cuefinder_core::models::booking::StatusExtras;
use cuefinder_core::store::{BookingQuery, SortOrder};
use eyre::Result;
use sqlx::{Pool, Postgres, QueryBuilder};

const BOOKING_COLUMNS: &str = "id, venue_id, user_id, table_ids, start_time, end_time, \
    party_size, status, total_cost, deposit_amount, confirmation_code, notes, \
    special_requests, customer_name, customer_phone, customer_email, cancellation_reason, \
    no_show_fee, actual_start_time, grace_period_minutes, created_at, updated_at";

pub async fn query_bookings(pool: &Pool<Postgres>, query: &BookingQuery) -> Result<Vec<DbBooking>> {
    tracing::debug!("Querying bookings: {:?}", query);

    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM bookings WHERE venue_id = ",
        BOOKING_COLUMNS
    ));
    builder.push_bind(query.venue_id.as_str());
    if let Some(from) = query.start_from {
        builder.push(" AND start_time >= ").push_bind(from);
    }
    if let Some(until) = query.start_until {
        builder.push(" AND start_time <= ").push_bind(until);
    }
    builder.push(match query.order {
        SortOrder::Ascending => " ORDER BY start_time ASC, id ASC",
        SortOrder::Descending => " ORDER BY start_time DESC, id ASC",
    });
    if let Some(limit) = query.limit {
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }

    let bookings = builder
        .build_query_as::<DbBooking>()
        .fetch_all(pool)
        .await?;

    tracing::debug!("Found {} bookings for venue {}", bookings.len(), query.venue_id);
    Ok(bookings)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: &str) -> Result<Option<DbBooking>> {
    tracing::debug!("Getting booking by id: {}", id);

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {} FROM bookings WHERE id = $1",
        BOOKING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Writes the new status. Extras left as `None` keep their stored value.
/// Returns `None` when no booking has the id.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: &str,
    status: &str,
    extras: &StatusExtras,
) -> Result<Option<DbBooking>> {
    tracing::debug!("Updating booking {} to status {}", id, status);

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2,
            cancellation_reason = COALESCE($3, cancellation_reason),
            no_show_fee = COALESCE($4, no_show_fee),
            actual_start_time = COALESCE($5, actual_start_time),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    ))
    .bind(id)
    .bind(status)
    .bind(extras.cancellation_reason.as_deref())
    .bind(extras.no_show_fee)
    .bind(extras.actual_start_time)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Inserts a booking or overwrites the stored one with the same id.
pub async fn upsert_booking(pool: &Pool<Postgres>, booking: &DbBooking) -> Result<DbBooking> {
    let stored = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings ({columns})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22)
        ON CONFLICT (id) DO UPDATE SET
            table_ids = EXCLUDED.table_ids,
            start_time = EXCLUDED.start_time,
            end_time = EXCLUDED.end_time,
            party_size = EXCLUDED.party_size,
            status = EXCLUDED.status,
            total_cost = EXCLUDED.total_cost,
            cancellation_reason = EXCLUDED.cancellation_reason,
            no_show_fee = EXCLUDED.no_show_fee,
            actual_start_time = EXCLUDED.actual_start_time,
            updated_at = EXCLUDED.updated_at
        RETURNING {columns}
        "#,
        columns = BOOKING_COLUMNS
    ))
    .bind(&booking.id)
    .bind(&booking.venue_id)
    .bind(&booking.user_id)
    .bind(&booking.table_ids)
    .bind(booking.start_time)
    .bind(booking.end_time)
    .bind(booking.party_size)
    .bind(&booking.status)
    .bind(booking.total_cost)
    .bind(booking.deposit_amount)
    .bind(&booking.confirmation_code)
    .bind(&booking.notes)
    .bind(&booking.special_requests)
    .bind(&booking.customer_name)
    .bind(&booking.customer_phone)
    .bind(&booking.customer_email)
    .bind(&booking.cancellation_reason)
    .bind(booking.no_show_fee)
    .bind(booking.actual_start_time)
    .bind(booking.grace_period_minutes)
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}
