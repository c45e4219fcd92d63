use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id VARCHAR(255) PRIMARY KEY,
            email VARCHAR(255) NOT NULL UNIQUE,
            display_name VARCHAR(255) NOT NULL DEFAULT '',
            role VARCHAR(32) NOT NULL DEFAULT 'customer',
            owned_venue_ids TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create credentials table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS credentials (
            email VARCHAR(255) PRIMARY KEY,
            user_id VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create venues table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            id VARCHAR(255) PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            address TEXT NOT NULL DEFAULT '',
            phone VARCHAR(64) NULL,
            email VARCHAR(255) NULL,
            website TEXT NULL,
            venue_type VARCHAR(64) NOT NULL DEFAULT 'pool_hall',
            table_count INTEGER NOT NULL DEFAULT 0,
            price_per_hour NUMERIC(10, 2) NULL,
            booking_enabled BOOLEAN NOT NULL DEFAULT FALSE,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            owner_id VARCHAR(255) NULL,
            owner_email VARCHAR(255) NULL,
            claimed_at TIMESTAMP WITH TIME ZONE NULL,
            verification_status VARCHAR(32) NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create pool_tables table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pool_tables (
            id VARCHAR(255) PRIMARY KEY,
            venue_id VARCHAR(255) NOT NULL REFERENCES venues(id),
            number VARCHAR(32) NOT NULL,
            size VARCHAR(8) NOT NULL DEFAULT '8ft',
            table_type VARCHAR(32) NOT NULL DEFAULT 'standard',
            hourly_rate NUMERIC(10, 2) NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            maintenance_status VARCHAR(32) NOT NULL DEFAULT 'good',
            status VARCHAR(32) NOT NULL DEFAULT 'available',
            current_booking_id VARCHAR(255) NULL,
            features TEXT[] NOT NULL DEFAULT '{}',
            location TEXT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id VARCHAR(255) PRIMARY KEY,
            venue_id VARCHAR(255) NOT NULL REFERENCES venues(id),
            user_id VARCHAR(255) NOT NULL,
            table_ids TEXT[] NOT NULL DEFAULT '{}',
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            party_size INTEGER NOT NULL DEFAULT 1,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            total_cost NUMERIC(10, 2) NOT NULL DEFAULT 0,
            deposit_amount NUMERIC(10, 2) NULL,
            confirmation_code VARCHAR(32) NOT NULL,
            notes TEXT NULL,
            special_requests TEXT[] NOT NULL DEFAULT '{}',
            customer_name VARCHAR(255) NULL,
            customer_phone VARCHAR(64) NULL,
            customer_email VARCHAR(255) NULL,
            cancellation_reason TEXT NULL,
            no_show_fee NUMERIC(10, 2) NULL,
            actual_start_time TIMESTAMP WITH TIME ZONE NULL,
            grace_period_minutes INTEGER NOT NULL DEFAULT 15,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Change notifications. The payload is "<collection>:<venue id>"; the
    // trigger argument names the column holding the venue id.
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION notify_cuefinder_change() RETURNS trigger AS $$
        DECLARE
            row_data JSONB;
        BEGIN
            IF TG_OP = 'DELETE' THEN
                row_data := to_jsonb(OLD);
            ELSE
                row_data := to_jsonb(NEW);
            END IF;
            PERFORM pg_notify(
                'cuefinder_changes',
                TG_ARGV[0] || ':' || (row_data ->> TG_ARGV[1])
            );
            RETURN NULL;
        END;
        $$ LANGUAGE plpgsql;
        "#,
    )
    .execute(pool)
    .await?;

    for (table, collection, column) in [
        ("bookings", "bookings", "venue_id"),
        ("pool_tables", "tables", "venue_id"),
        ("venues", "venues", "id"),
    ] {
        sqlx::query(&format!("DROP TRIGGER IF EXISTS {table}_notify ON {table}"))
            .execute(pool)
            .await?;
        sqlx::query(&format!(
            "CREATE TRIGGER {table}_notify AFTER INSERT OR UPDATE OR DELETE ON {table} \
             FOR EACH ROW EXECUTE FUNCTION notify_cuefinder_change('{collection}', '{column}')"
        ))
        .execute(pool)
        .await?;
    }

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_bookings_venue_start ON bookings(venue_id, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)",
        "CREATE INDEX IF NOT EXISTS idx_pool_tables_venue_id ON pool_tables(venue_id)",
        "CREATE INDEX IF NOT EXISTS idx_venues_name ON venues(name)",
        "CREATE INDEX IF NOT EXISTS idx_venues_owner_id ON venues(owner_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
