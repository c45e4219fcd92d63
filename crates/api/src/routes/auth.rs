use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/sign-in", post(handlers::auth::sign_in))
        .route("/api/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        .route("/api/auth/session", get(handlers::auth::current_session))
}
