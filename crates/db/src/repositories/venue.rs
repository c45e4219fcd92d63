use crate::models::{ClaimOutcome, DbVenue};
use cuefinder_core::models::venue::VenueClaim;
use eyre::Result;
use sqlx::{Pool, Postgres};

const VENUE_COLUMNS: &str = "id, name, address, phone, email, website, venue_type, table_count, \
    price_per_hour, booking_enabled, is_active, owner_id, owner_email, claimed_at, \
    verification_status, timezone";

pub async fn list_active_venues(pool: &Pool<Postgres>, limit: usize) -> Result<Vec<DbVenue>> {
    let venues = sqlx::query_as::<_, DbVenue>(&format!(
        "SELECT {} FROM venues WHERE is_active ORDER BY name ASC LIMIT $1",
        VENUE_COLUMNS
    ))
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;

    tracing::debug!("Loaded {} active venues", venues.len());
    Ok(venues)
}

pub async fn get_venue_by_id(pool: &Pool<Postgres>, id: &str) -> Result<Option<DbVenue>> {
    let venue = sqlx::query_as::<_, DbVenue>(&format!(
        "SELECT {} FROM venues WHERE id = $1",
        VENUE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(venue)
}

/// Claims an unowned venue and records it on the claimant in one
/// transaction. The `owner_id IS NULL` guard makes concurrent claims
/// resolve to a single winner.
pub async fn claim_venue(pool: &Pool<Postgres>, id: &str, claim: &VenueClaim) -> Result<ClaimOutcome> {
    tracing::debug!("Claiming venue {} for user {}", id, claim.user_id);

    let mut tx = pool.begin().await?;

    let claimed = sqlx::query_as::<_, DbVenue>(&format!(
        r#"
        UPDATE venues
        SET owner_id = $2,
            owner_email = $3,
            verification_status = $4,
            claimed_at = $5,
            booking_enabled = TRUE,
            updated_at = NOW()
        WHERE id = $1 AND owner_id IS NULL
        RETURNING {}
        "#,
        VENUE_COLUMNS
    ))
    .bind(id)
    .bind(&claim.user_id)
    .bind(&claim.user_email)
    .bind(claim.verification_status.as_str())
    .bind(claim.claimed_at)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(venue) = claimed else {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM venues WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.rollback().await?;

        return Ok(if exists {
            ClaimOutcome::AlreadyClaimed
        } else {
            ClaimOutcome::NotFound
        });
    };

    sqlx::query(
        r#"
        UPDATE users
        SET owned_venue_ids = array_append(owned_venue_ids, $2)
        WHERE id = $1 AND NOT ($2 = ANY(owned_venue_ids))
        "#,
    )
    .bind(&claim.user_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Venue {} claimed by {}", id, claim.user_id);
    Ok(ClaimOutcome::Claimed(venue))
}

pub async fn upsert_venue(pool: &Pool<Postgres>, venue: &DbVenue) -> Result<DbVenue> {
    let stored = sqlx::query_as::<_, DbVenue>(&format!(
        r#"
        INSERT INTO venues ({columns})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            address = EXCLUDED.address,
            phone = EXCLUDED.phone,
            email = EXCLUDED.email,
            website = EXCLUDED.website,
            venue_type = EXCLUDED.venue_type,
            table_count = EXCLUDED.table_count,
            price_per_hour = EXCLUDED.price_per_hour,
            booking_enabled = EXCLUDED.booking_enabled,
            is_active = EXCLUDED.is_active,
            timezone = EXCLUDED.timezone,
            updated_at = NOW()
        RETURNING {columns}
        "#,
        columns = VENUE_COLUMNS
    ))
    .bind(&venue.id)
    .bind(&venue.name)
    .bind(&venue.address)
    .bind(&venue.phone)
    .bind(&venue.email)
    .bind(&venue.website)
    .bind(&venue.venue_type)
    .bind(venue.table_count)
    .bind(venue.price_per_hour)
    .bind(venue.booking_enabled)
    .bind(venue.is_active)
    .bind(&venue.owner_id)
    .bind(&venue.owner_email)
    .bind(venue.claimed_at)
    .bind(&venue.verification_status)
    .bind(&venue.timezone)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}
