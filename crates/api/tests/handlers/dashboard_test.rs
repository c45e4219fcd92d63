use axum::http::StatusCode;
use cuefinder_db::demo::DEMO_VENUE_ID;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::test_utils::{bearer, TestContext};

fn table<'a>(body: &'a Value, id: &str) -> &'a Value {
    body["tables"]
        .as_array()
        .unwrap()
        .iter()
        .find(|table| table["id"] == id)
        .unwrap()
}

#[test_log::test(tokio::test)]
async fn test_dashboard_marks_walk_in_table_occupied() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;
    ctx.store.insert_booking(ctx.walk_in("walk-in-1", "table-1"));
    let path = format!("/api/venues/{}/dashboard", DEMO_VENUE_ID);

    let response = bearer(ctx.server.get(&path), &token).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["venue"]["id"], DEMO_VENUE_ID);
    assert_eq!(body["stats"]["total_tables"], 12);
    assert_eq!(body["stats"]["active_tables"], 11);
    assert_eq!(body["stats"]["occupying_bookings"]["table-1"], "walk-in-1");
    assert!(body["updated_tables"].as_u64().unwrap() >= 1);

    let walk_in_table = table(&body, "table-1");
    assert_eq!(walk_in_table["status"], "occupied");
    assert_eq!(walk_in_table["current_booking_id"], "walk-in-1");
    assert_eq!(table(&body, "table-6")["status"], "maintenance");

    // A second refresh has nothing left to write.
    let again = bearer(ctx.server.get(&path), &token).await.json::<Value>();
    assert_eq!(again["updated_tables"], 0);
    assert_eq!(table(&again, "table-1")["status"], "occupied");
}

#[tokio::test]
async fn test_dashboard_requires_ownership() {
    let ctx = TestContext::new();
    let token = ctx.sign_up("owner@cueroom.example", "venue-cue-room").await;

    let response = bearer(
        ctx.server.get(&format!("/api/venues/{}/dashboard", DEMO_VENUE_ID)),
        &token,
    )
    .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_weekly_analytics_cover_seven_days() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(
        ctx.server.get(&format!("/api/venues/{}/analytics", DEMO_VENUE_ID)),
        &token,
    )
    .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["range"], "week");

    let days = body["daily_revenue"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    let daily_total: Decimal = days
        .iter()
        .map(|day| day["revenue"].as_str().unwrap().parse::<Decimal>().unwrap())
        .sum();
    let total: Decimal = body["total_revenue"].as_str().unwrap().parse().unwrap();
    assert_eq!(daily_total, total);
    assert!(body["booking_count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_monthly_analytics_cover_thirty_days() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(
        ctx.server
            .get(&format!("/api/venues/{}/analytics", DEMO_VENUE_ID))
            .add_query_param("range", "month"),
        &token,
    )
    .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["range"], "month");
    assert_eq!(body["daily_revenue"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_unknown_analytics_range_is_rejected() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(
        ctx.server
            .get(&format!("/api/venues/{}/analytics", DEMO_VENUE_ID))
            .add_query_param("range", "year"),
        &token,
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
