use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/venues/search", get(handlers::venues::search_venues))
        .route("/api/venues/:id", get(handlers::venues::get_venue))
        .route("/api/venues/:id/claim", post(handlers::venues::claim_venue))
}
