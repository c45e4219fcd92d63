use std::sync::Arc;

use cuefinder_core::directory::VenueDirectory;
use cuefinder_core::errors::DeskError;
use cuefinder_core::models::booking::{BookingStatus, StatusExtras};
use cuefinder_core::models::venue::ClaimPolicy;
use cuefinder_core::repository::BookingRepository;
use cuefinder_db::mock::repositories::{MockBookings, MockFeed, MockVenues};
use tokio::sync::broadcast;

fn idle_feed() -> MockFeed {
    let mut feed = MockFeed::new();
    feed.expect_changes().returning(|| broadcast::channel(1).1);
    feed
}

#[tokio::test]
async fn test_store_failure_reaches_caller_unchanged() {
    let mut store = MockBookings::new();
    store
        .expect_get_booking()
        .withf(|id| id == "b1")
        .times(1)
        .returning(|_| Err(DeskError::Database(eyre::eyre!("connection reset"))));
    store.expect_update_booking_status().never();

    let repository = BookingRepository::new(Arc::new(store), Arc::new(idle_feed()));
    let result = repository
        .update_status("b1", BookingStatus::Confirmed, StatusExtras::default())
        .await;

    match result {
        Err(DeskError::Database(report)) => assert!(report.to_string().contains("connection reset")),
        other => panic!("expected database error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_failure_is_not_swallowed() {
    let mut store = MockBookings::new();
    store
        .expect_query_bookings()
        .returning(|_| Err(DeskError::Database(eyre::eyre!("timeout"))));

    let repository = BookingRepository::new(Arc::new(store), Arc::new(idle_feed()));

    assert!(matches!(
        repository.list_bookings("v1", None).await,
        Err(DeskError::Database(_))
    ));
}

#[tokio::test]
async fn test_store_claim_conflict_propagates() {
    let mut venues = MockVenues::new();
    venues
        .expect_claim_venue()
        .withf(|id, claim| id == "v1" && claim.user_id == "u2")
        .times(1)
        .returning(|id, _| Err(DeskError::AlreadyClaimed(id.to_string())));

    let directory = VenueDirectory::new(Arc::new(venues), ClaimPolicy::AutoVerify);
    let result = directory.claim("v1", "u2", "two@example.com").await;

    assert!(matches!(result, Err(DeskError::AlreadyClaimed(ref id)) if id == "v1"));
}

#[tokio::test]
async fn test_search_failure_propagates() {
    let mut venues = MockVenues::new();
    venues
        .expect_list_active_venues()
        .returning(|_| Err(DeskError::Database(eyre::eyre!("offline"))));

    let directory = VenueDirectory::new(Arc::new(venues), ClaimPolicy::AutoVerify);

    assert!(matches!(
        directory.search("cue").await,
        Err(DeskError::Database(_))
    ));
}
