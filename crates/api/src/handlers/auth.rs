use axum::{extract::State, http::StatusCode, Json};
use cuefinder_core::{
    auth::DashboardSession,
    models::user::{SessionResponse, SignInRequest, SignUpRequest},
};
use std::sync::Arc;

use crate::{
    middleware::{auth::OwnerSession, error_handling::AppError},
    ApiState,
};

fn session_response(session: &DashboardSession) -> SessionResponse {
    SessionResponse {
        token: session.token.clone(),
        user_id: session.user.id.clone(),
        email: session.user.email.clone(),
        needs_venue_claim: session.needs_venue_claim(),
        owned_venue_ids: session.user.owned_venue_ids.clone(),
    }
}

#[axum::debug_handler]
pub async fn sign_in(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.auth.sign_in(&payload.email, &payload.password).await?;
    Ok(Json(session_response(&session)))
}

#[axum::debug_handler]
pub async fn sign_up(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = state
        .auth
        .sign_up(&payload.email, &payload.password, &payload.venue_id)
        .await?;
    Ok((StatusCode::CREATED, Json(session_response(&session))))
}

#[axum::debug_handler]
pub async fn sign_out(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
) -> Result<StatusCode, AppError> {
    state.auth.sign_out(&session.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the session behind the bearer token, re-reading the owner's
/// venues so a fresh claim shows up without signing in again.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn current_session(OwnerSession(session): OwnerSession) -> Json<SessionResponse> {
    Json(session_response(&session))
}
