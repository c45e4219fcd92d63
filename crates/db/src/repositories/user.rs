use crate::models::DbUser;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: &str) -> Result<Option<DbUser>> {
    tracing::debug!("Getting user by id: {}", id);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, display_name, role, owned_venue_ids, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Creates the profile or replaces an existing one with the same id.
pub async fn upsert_user(pool: &Pool<Postgres>, user: &DbUser) -> Result<DbUser> {
    let stored = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, display_name, role, owned_venue_ids, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            email = EXCLUDED.email,
            display_name = EXCLUDED.display_name,
            role = EXCLUDED.role,
            owned_venue_ids = EXCLUDED.owned_venue_ids
        RETURNING id, email, display_name, role, owned_venue_ids, created_at
        "#,
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.display_name)
    .bind(&user.role)
    .bind(&user.owned_venue_ids)
    .bind(user.created_at)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Stored user profile {}", stored.id);
    Ok(stored)
}
