//! # Authentication Middleware
//!
//! Resolves the `Authorization: Bearer <token>` header into a
//! [`DashboardSession`]. Handlers that take an [`OwnerSession`] argument
//! only run for signed-in venue owners; venue-scoped handlers then call
//! [`DashboardSession::authorize_venue`] before touching any data.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use cuefinder_core::{auth::DashboardSession, errors::DeskError};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Clone)]
pub struct OwnerSession(pub DashboardSession);

/// Pulls the token out of a `Bearer` authorization header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for OwnerSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| DeskError::Authentication("Missing bearer token".to_string()))?;

        let session = state.auth.resume(token).await?;
        Ok(OwnerSession(session))
    }
}
