use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/venues/:id/bookings",
            get(handlers::bookings::list_bookings),
        )
        .route(
            "/api/venues/:id/bookings/live",
            get(handlers::bookings::live_bookings),
        )
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/api/bookings/:id/status",
            put(handlers::bookings::update_booking_status),
        )
}
