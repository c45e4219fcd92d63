#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::{DateTime, Utc};
use cuefinder_api::{build_router, config::ApiConfig, ApiState};
use cuefinder_core::models::booking::{Booking, BookingStatus};
use cuefinder_db::demo::{self, DemoData, DEMO_EMAIL, DEMO_PASSWORD};
use cuefinder_db::memory::MemoryStore;
use serde_json::{json, Value};

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub data: DemoData,
    pub server: TestServer,
    pub now: DateTime<Utc>,
}

impl TestContext {
    /// A server over the seeded demo venue.
    pub fn new() -> Self {
        let now = Utc::now();
        let store = Arc::new(MemoryStore::new());
        let data = demo::dataset(now).unwrap();
        demo::load_into_memory(&store, &data).unwrap();

        let config = ApiConfig::default();
        let state = Arc::new(ApiState::from_store(store.clone(), &config));
        let server = TestServer::new(build_router(state, &config)).unwrap();

        Self {
            store,
            data,
            server,
            now,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/sign-in")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn demo_token(&self) -> String {
        self.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await
    }

    /// Registers a second owner for `venue_id` and returns their token.
    pub async fn sign_up(&self, email: &str, venue_id: &str) -> String {
        let response = self
            .server
            .post("/api/auth/sign-up")
            .json(&json!({ "email": email, "password": "correct-horse", "venue_id": venue_id }))
            .await;
        response.json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// A walk-in on `table_id` that started this instant.
    pub fn walk_in(&self, id: &str, table_id: &str) -> Booking {
        let mut booking = self.data.bookings[0].clone();
        let now = Utc::now();
        booking.id = id.to_string();
        booking.table_ids = vec![table_id.to_string()];
        booking.start_time = now;
        booking.end_time = now + chrono::Duration::minutes(90);
        booking.status = BookingStatus::InProgress;
        booking.actual_start_time = Some(now);
        booking
    }
}

pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}
