//! Storage backends for the venue dashboard.
//!
//! [`store::PgStore`] is the live Postgres backend with a LISTEN/NOTIFY
//! change feed. [`memory::MemoryStore`] keeps everything in process and
//! backs demo mode and the tests.

pub mod auth;
pub mod demo;
pub mod listener;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}
