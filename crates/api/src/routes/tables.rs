use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/venues/:id/tables", get(handlers::tables::list_tables))
        .route(
            "/api/venues/:id/tables/free",
            get(handlers::tables::list_free_tables),
        )
        .route(
            "/api/tables/:id/status",
            put(handlers::tables::update_table_status),
        )
}
