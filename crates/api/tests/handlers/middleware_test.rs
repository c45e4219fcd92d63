use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use cuefinder_api::middleware::error_handling::{status_for, AppError};
use cuefinder_core::errors::DeskError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[case::not_found(DeskError::NotFound("booking".into()), StatusCode::NOT_FOUND)]
#[case::validation(DeskError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case::transition(DeskError::invalid_transition("completed", "pending"), StatusCode::CONFLICT)]
#[case::claimed(DeskError::AlreadyClaimed("v1".into()), StatusCode::CONFLICT)]
#[case::malformed(DeskError::malformed("b1", "no tables assigned"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case::denied(DeskError::AccessDenied("not yours".into()), StatusCode::FORBIDDEN)]
#[case::unauthenticated(DeskError::Authentication("who".into()), StatusCode::UNAUTHORIZED)]
#[case::database(DeskError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] err: DeskError, #[case] expected: StatusCode) {
    assert_eq!(status_for(&err), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = AppError(DeskError::invalid_transition("completed", "pending")).into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body["error"],
        "Invalid status transition: completed -> pending"
    );
}

#[tokio::test]
async fn test_eyre_reports_become_server_errors() {
    let err: AppError = eyre::eyre!("pool exhausted").into();

    let response = err.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
