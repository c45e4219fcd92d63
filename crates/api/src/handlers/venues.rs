use axum::{
    extract::{Path, Query, State},
    Json,
};
use cuefinder_core::{
    auth::DashboardSession,
    errors::DeskError,
    models::venue::{ClaimVenueResponse, Venue, VenueSearchQuery},
};
use std::sync::Arc;

use crate::{
    middleware::{auth::OwnerSession, error_handling::AppError},
    ApiState,
};

/// Loads a venue after checking the session owns it.
pub(crate) async fn owned_venue(
    state: &ApiState,
    session: &DashboardSession,
    venue_id: &str,
) -> Result<Venue, AppError> {
    session.authorize_venue(venue_id)?;
    Ok(state.directory.get_venue(venue_id).await?)
}

#[axum::debug_handler]
pub async fn search_venues(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<VenueSearchQuery>,
) -> Result<Json<Vec<Venue>>, AppError> {
    let venues = state.directory.search(&query.q).await?;
    Ok(Json(venues))
}

#[axum::debug_handler]
pub async fn get_venue(
    State(state): State<Arc<ApiState>>,
    Path(venue_id): Path<String>,
) -> Result<Json<Venue>, AppError> {
    let venue = state.directory.get_venue(&venue_id).await?;
    Ok(Json(venue))
}

#[axum::debug_handler]
pub async fn claim_venue(
    State(state): State<Arc<ApiState>>,
    OwnerSession(session): OwnerSession,
    Path(venue_id): Path<String>,
) -> Result<Json<ClaimVenueResponse>, AppError> {
    let venue = state
        .directory
        .claim(&venue_id, &session.user.id, &session.user.email)
        .await?;

    let owner_id = venue
        .owner_id
        .clone()
        .ok_or_else(|| DeskError::NotFound(format!("Owner of venue {} not recorded", venue.id)))?;
    let verification_status = venue.verification_status.unwrap_or_else(|| {
        state.directory.policy().verification_status()
    });

    Ok(Json(ClaimVenueResponse {
        venue_id: venue.id,
        owner_id,
        verification_status,
    }))
}
