use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat};
use cuefinder_db::demo::DEMO_VENUE_ID;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{bearer, TestContext};

fn ids(tables: &[Value]) -> Vec<&str> {
    tables
        .iter()
        .map(|table| table["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_lists_tables_in_number_order() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(
        ctx.server.get(&format!("/api/venues/{}/tables", DEMO_VENUE_ID)),
        &token,
    )
    .await;

    response.assert_status_ok();
    let tables = response.json::<Vec<Value>>();
    assert_eq!(tables.len(), 12);
    assert_eq!(tables[0]["number"], "1");
    assert_eq!(tables[1]["number"], "2");
}

#[tokio::test]
async fn test_maintenance_round_trip() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let down = bearer(ctx.server.put("/api/tables/table-1/status"), &token)
        .json(&json!({ "status": "maintenance" }))
        .await;
    down.assert_status_ok();
    assert_eq!(down.json::<Value>()["status"], "maintenance");

    let up = bearer(ctx.server.put("/api/tables/table-1/status"), &token)
        .json(&json!({ "status": "available" }))
        .await;
    up.assert_status_ok();
    assert_eq!(up.json::<Value>()["status"], "available");
}

#[tokio::test]
async fn test_occupancy_cannot_be_set_by_hand() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;

    let response = bearer(ctx.server.put("/api/tables/table-1/status"), &token)
        .json(&json!({ "status": "occupied" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["error"],
        "Invalid status transition: available -> occupied"
    );
}

#[tokio::test]
async fn test_free_tables_skip_booked_and_inactive() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;
    // booking-4 holds tables 7 and 8 from now + 1h for two hours.
    let start = ctx.now + Duration::minutes(70);
    let end = start + Duration::minutes(30);

    let response = bearer(
        ctx.server
            .get(&format!("/api/venues/{}/tables/free", DEMO_VENUE_ID))
            .add_query_param("start", start.to_rfc3339_opts(SecondsFormat::Secs, true))
            .add_query_param("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        &token,
    )
    .await;

    response.assert_status_ok();
    let tables = response.json::<Vec<Value>>();
    let free = ids(&tables);
    assert_eq!(free.len(), 9);
    for taken in ["table-6", "table-7", "table-8"] {
        assert!(!free.contains(&taken), "{} should not be free", taken);
    }
}

#[tokio::test]
async fn test_free_tables_rejects_empty_window() {
    let ctx = TestContext::new();
    let token = ctx.demo_token().await;
    let at = ctx.now.to_rfc3339_opts(SecondsFormat::Secs, true);

    let response = bearer(
        ctx.server
            .get(&format!("/api/venues/{}/tables/free", DEMO_VENUE_ID))
            .add_query_param("start", &at)
            .add_query_param("end", &at),
        &token,
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_owner_cannot_touch_demo_tables() {
    let ctx = TestContext::new();
    let token = ctx.sign_up("owner@corner.example", "venue-corner-pocket").await;

    let response = bearer(ctx.server.put("/api/tables/table-1/status"), &token)
        .json(&json!({ "status": "maintenance" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}
