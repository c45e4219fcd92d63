use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/venues/:id/dashboard",
            get(handlers::dashboard::dashboard),
        )
        .route(
            "/api/venues/:id/analytics",
            get(handlers::dashboard::analytics),
        )
}
