use crate::models::DbCredential;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

/// Stores a credential. Returns `None` when the email is already taken.
pub async fn create_credential(
    pool: &Pool<Postgres>,
    email: &str,
    user_id: &str,
    password_hash: &str,
) -> Result<Option<DbCredential>> {
    let credential = sqlx::query_as::<_, DbCredential>(
        r#"
        INSERT INTO credentials (email, user_id, password_hash, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING email, user_id, password_hash, created_at
        "#,
    )
    .bind(email)
    .bind(user_id)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(credential)
}

pub async fn get_credential_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbCredential>> {
    let credential = sqlx::query_as::<_, DbCredential>(
        r#"
        SELECT email, user_id, password_hash, created_at
        FROM credentials
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(credential)
}
