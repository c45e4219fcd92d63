use crate::models::DbTable;
use eyre::Result;
use sqlx::{Pool, Postgres};

const TABLE_COLUMNS: &str = "id, venue_id, number, size, table_type, hourly_rate, is_active, \
    maintenance_status, status, current_booking_id, features, location";

/// Numeric table numbers sort as numbers, anything else after them by text.
const TABLE_ORDER: &str =
    "ORDER BY CASE WHEN number ~ '^[0-9]+$' THEN number::INTEGER END NULLS LAST, number";

pub async fn get_tables_by_venue_id(pool: &Pool<Postgres>, venue_id: &str) -> Result<Vec<DbTable>> {
    tracing::debug!("Getting tables for venue: {}", venue_id);

    let tables = sqlx::query_as::<_, DbTable>(&format!(
        "SELECT {} FROM pool_tables WHERE venue_id = $1 {}",
        TABLE_COLUMNS, TABLE_ORDER
    ))
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    tracing::debug!("Found {} tables for venue {}", tables.len(), venue_id);
    Ok(tables)
}

pub async fn get_table_by_id(pool: &Pool<Postgres>, id: &str) -> Result<Option<DbTable>> {
    let table = sqlx::query_as::<_, DbTable>(&format!(
        "SELECT {} FROM pool_tables WHERE id = $1",
        TABLE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(table)
}

pub async fn update_table_status(
    pool: &Pool<Postgres>,
    id: &str,
    status: &str,
    current_booking_id: Option<&str>,
) -> Result<Option<DbTable>> {
    tracing::debug!(
        "Updating table {} to status {} (booking {:?})",
        id, status, current_booking_id
    );

    let table = sqlx::query_as::<_, DbTable>(&format!(
        r#"
        UPDATE pool_tables
        SET status = $2, current_booking_id = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        TABLE_COLUMNS
    ))
    .bind(id)
    .bind(status)
    .bind(current_booking_id)
    .fetch_optional(pool)
    .await?;

    Ok(table)
}

pub async fn upsert_table(pool: &Pool<Postgres>, table: &DbTable) -> Result<DbTable> {
    let stored = sqlx::query_as::<_, DbTable>(&format!(
        r#"
        INSERT INTO pool_tables ({columns})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (id) DO UPDATE SET
            number = EXCLUDED.number,
            size = EXCLUDED.size,
            table_type = EXCLUDED.table_type,
            hourly_rate = EXCLUDED.hourly_rate,
            is_active = EXCLUDED.is_active,
            maintenance_status = EXCLUDED.maintenance_status,
            status = EXCLUDED.status,
            current_booking_id = EXCLUDED.current_booking_id,
            features = EXCLUDED.features,
            location = EXCLUDED.location,
            updated_at = NOW()
        RETURNING {columns}
        "#,
        columns = TABLE_COLUMNS
    ))
    .bind(&table.id)
    .bind(&table.venue_id)
    .bind(&table.number)
    .bind(&table.size)
    .bind(&table.table_type)
    .bind(table.hourly_rate)
    .bind(table.is_active)
    .bind(&table.maintenance_status)
    .bind(&table.status)
    .bind(&table.current_booking_id)
    .bind(&table.features)
    .bind(&table.location)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}
