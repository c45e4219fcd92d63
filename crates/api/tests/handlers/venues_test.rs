use axum::http::StatusCode;
use cuefinder_db::demo::{DEMO_USER_ID, DEMO_VENUE_ID};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{bearer, TestContext};

#[tokio::test]
async fn test_search_lists_only_unclaimed_venues() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/venues/search")
        .add_query_param("q", "seattle")
        .await;

    response.assert_status_ok();
    let venues = response.json::<Vec<Value>>();
    assert_eq!(venues.len(), 3);
    assert!(venues.iter().all(|venue| venue["id"] != DEMO_VENUE_ID));
}

#[tokio::test]
async fn test_search_ignores_single_character_terms() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/venues/search")
        .add_query_param("q", "e")
        .await;

    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());
}

#[tokio::test]
async fn test_unknown_venue_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/venues/nowhere").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"],
        "Resource not found: Venue with ID nowhere not found"
    );
}

#[tokio::test]
async fn test_claim_records_owner_once() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(ctx.server.post("/api/venues/venue-cue-room/claim"), &token).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["venue_id"], "venue-cue-room");
    assert_eq!(body["owner_id"], DEMO_USER_ID);
    assert_eq!(body["verification_status"], "verified");

    let again = bearer(ctx.server.post("/api/venues/venue-cue-room/claim"), &token).await;
    again.assert_status(StatusCode::CONFLICT);

    let session = bearer(ctx.server.get("/api/auth/session"), &token)
        .await
        .json::<Value>();
    let owned = session["owned_venue_ids"].as_array().unwrap();
    assert!(owned.iter().any(|id| id == "venue-cue-room"));
}

#[tokio::test]
async fn test_claim_requires_session() {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/venues/venue-cue-room/claim").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
