use axum::http::StatusCode;
use cuefinder_db::demo::{DEMO_EMAIL, DEMO_USER_ID, DEMO_VENUE_ID};
use fake::{faker::internet::en::SafeEmail, Fake};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{bearer, TestContext};

#[tokio::test]
async fn test_sign_in_returns_owner_session() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": "Demo@CueFinder.app", "password": "cuefinder-demo" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["user_id"], DEMO_USER_ID);
    assert_eq!(body["email"], DEMO_EMAIL);
    assert_eq!(body["needs_venue_claim"], false);
    assert_eq!(body["owned_venue_ids"], json!([DEMO_VENUE_ID]));
    assert_eq!(body["token"].as_str().unwrap().len(), 48);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": DEMO_EMAIL, "password": "not-the-password" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        "Authentication error: Invalid email or password"
    );
}

#[tokio::test]
async fn test_session_round_trip_and_sign_out() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let session = bearer(ctx.server.get("/api/auth/session"), &token).await;
    session.assert_status_ok();
    assert_eq!(session.json::<Value>()["user_id"], DEMO_USER_ID);

    bearer(ctx.server.post("/api/auth/sign-out"), &token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    bearer(ctx.server.get("/api/auth/session"), &token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_requires_token() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/auth/session").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_claims_venue_pending_review() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": "owner@rackem.example",
            "password": "correct-horse",
            "venue_id": "venue-rack-em"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["needs_venue_claim"], false);
    assert_eq!(body["owned_venue_ids"], json!(["venue-rack-em"]));

    let venue = ctx.server.get("/api/venues/venue-rack-em").await.json::<Value>();
    assert_eq!(venue["owner_email"], "owner@rackem.example");
    assert_eq!(venue["verification_status"], "pending");
}

#[tokio::test]
async fn test_sign_up_rejects_short_password() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": "owner@rackem.example",
            "password": "short",
            "venue_id": "venue-rack-em"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_up_for_claimed_venue_conflicts() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": "someone@example.com",
            "password": "correct-horse",
            "venue_id": DEMO_VENUE_ID
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_new_owner_can_sign_back_in() {
    let ctx = TestContext::new();
    let email: String = SafeEmail().fake();
    ctx.sign_up(&email, "venue-eight-ball").await;

    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": email, "password": "correct-horse" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["email"], email.to_lowercase());
    assert_eq!(body["owned_venue_ids"], json!(["venue-eight-ball"]));
}
