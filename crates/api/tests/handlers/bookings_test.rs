use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use cuefinder_db::demo::DEMO_VENUE_ID;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{bearer, TestContext};

#[tokio::test]
async fn test_lists_all_bookings_newest_first() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(
        ctx.server.get(&format!("/api/venues/{}/bookings", DEMO_VENUE_ID)),
        &token,
    )
    .await;

    response.assert_status_ok();
    let bookings = response.json::<Vec<Value>>();
    assert_eq!(bookings.len(), ctx.data.bookings.len());

    let starts: Vec<DateTime<Utc>> = bookings
        .iter()
        .map(|booking| booking["start_time"].as_str().unwrap().parse().unwrap())
        .collect();
    let mut sorted = starts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(starts, sorted);
}

#[tokio::test]
async fn test_date_filter_keeps_that_day_only() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;
    // Six days back only holds the three history bookings of that evening.
    let day = ctx.data.bookings.iter().find(|b| b.id == "history-6-1").unwrap();
    let tz: chrono_tz::Tz = "America/Los_Angeles".parse().unwrap();
    let date = day.start_time.with_timezone(&tz).date_naive();

    let response = bearer(
        ctx.server
            .get(&format!("/api/venues/{}/bookings", DEMO_VENUE_ID))
            .add_query_param("date", date.to_string()),
        &token,
    )
    .await;

    response.assert_status_ok();
    let ids: Vec<String> = response
        .json::<Vec<Value>>()
        .iter()
        .map(|booking| booking["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["history-6-1", "history-6-2", "history-6-3"]);
}

#[tokio::test]
async fn test_other_owner_cannot_read_demo_bookings() {
    let ctx = TestContext::new();
    let token = ctx.sign_up("owner@eightball.example", "venue-eight-ball").await;

    let response = bearer(
        ctx.server.get(&format!("/api/venues/{}/bookings", DEMO_VENUE_ID)),
        &token,
    )
    .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_confirms_pending_booking() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(ctx.server.put("/api/bookings/booking-6/status"), &token)
        .json(&json!({ "status": "confirmed" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "confirmed");

    let stored = bearer(ctx.server.get("/api/bookings/booking-6"), &token)
        .await
        .json::<Value>();
    assert_eq!(stored["status"], "confirmed");
}

#[tokio::test]
async fn test_cancellation_keeps_reason() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(ctx.server.put("/api/bookings/booking-5/status"), &token)
        .json(&json!({ "status": "cancelled", "cancellation_reason": "Customer called" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["cancellation_reason"], "Customer called");
}

#[rstest]
#[case::terminal_booking("booking-1", "cancelled", StatusCode::CONFLICT)]
#[case::skips_confirmation("booking-6", "in_progress", StatusCode::CONFLICT)]
#[case::before_grace_period("booking-4", "no_show", StatusCode::BAD_REQUEST)]
#[case::unknown_booking("booking-404", "confirmed", StatusCode::NOT_FOUND)]
#[case::unknown_status("booking-6", "lost", StatusCode::UNPROCESSABLE_ENTITY)]
#[tokio::test]
async fn test_rejected_status_changes(
    #[case] booking_id: &str,
    #[case] status: &str,
    #[case] expected: StatusCode,
) {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(
        ctx.server.put(&format!("/api/bookings/{}/status", booking_id)),
        &token,
    )
    .json(&json!({ "status": status }))
    .await;

    response.assert_status(expected);
}

#[tokio::test]
async fn test_no_show_fee_needs_no_show_status() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(ctx.server.put("/api/bookings/booking-4/status"), &token)
        .json(&json!({ "status": "cancelled", "no_show_fee": "25.00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
