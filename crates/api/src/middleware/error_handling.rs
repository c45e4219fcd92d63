//! # Error Handling Middleware
//!
//! Maps [`DeskError`] to HTTP status codes and `{"error": message}` bodies
//! so every handler reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use cuefinder_core::errors::DeskError;
use serde_json::json;
use tracing::error;

/// Wraps a [`DeskError`] so handlers can return it with `?`.
///
/// ```ignore
/// async fn handler(State(state): State<Arc<ApiState>>) -> Result<Json<Venue>, AppError> {
///     let venue = state.directory.get_venue("v1").await?;
///     Ok(Json(venue))
/// }
/// ```
#[derive(Debug)]
pub struct AppError(pub DeskError);

pub fn status_for(err: &DeskError) -> StatusCode {
    match err {
        DeskError::NotFound(_) => StatusCode::NOT_FOUND,
        DeskError::Validation(_) => StatusCode::BAD_REQUEST,
        DeskError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DeskError::AlreadyClaimed(_) => StatusCode::CONFLICT,
        DeskError::MalformedBooking { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DeskError::AccessDenied(_) => StatusCode::FORBIDDEN,
        DeskError::Authentication(_) => StatusCode::UNAUTHORIZED,
        DeskError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DeskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<DeskError> for AppError {
    fn from(err: DeskError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(DeskError::Database(err))
    }
}

/// Turns failures of the tower middleware stack into JSON responses.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        let body = Json(json!({ "error": "Request timed out" }));
        return (StatusCode::REQUEST_TIMEOUT, body).into_response();
    }

    AppError(DeskError::Internal(err)).into_response()
}
