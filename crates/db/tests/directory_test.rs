mod common;

use std::sync::Arc;

use common::{user, venue, Fixture};
use cuefinder_core::directory::VenueDirectory;
use cuefinder_core::errors::DeskError;
use cuefinder_core::models::user::UserRole;
use cuefinder_core::models::venue::{ClaimPolicy, VerificationStatus};
use cuefinder_core::store::UserStore;
use cuefinder_db::memory::MemoryStore;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_second_claim_is_rejected() {
    let fx = Fixture::new();
    fx.store.insert_venue(venue("v1", "Cue Club", "400 Main St"));
    fx.store
        .insert_user(user("u1", "one@example.com", UserRole::VenueOwner));

    let claimed = fx
        .directory
        .claim("v1", "u1", "one@example.com")
        .await
        .unwrap();
    assert_eq!(claimed.owner_id.as_deref(), Some("u1"));
    assert_eq!(claimed.owner_email.as_deref(), Some("one@example.com"));
    assert_eq!(claimed.verification_status, Some(VerificationStatus::Verified));
    assert!(claimed.booking_enabled);
    assert!(claimed.claimed_at.is_some());

    let second = fx.directory.claim("v1", "u2", "two@example.com").await;
    assert!(matches!(second, Err(DeskError::AlreadyClaimed(ref id)) if id == "v1"));

    let stored = fx.directory.get_venue("v1").await.unwrap();
    assert_eq!(stored.owner_id.as_deref(), Some("u1"));

    let owner = fx.store.get_user("u1").await.unwrap().unwrap();
    assert_eq!(owner.owned_venue_ids, vec!["v1"]);
}

#[tokio::test]
async fn test_review_policy_leaves_claim_pending() {
    let store = Arc::new(MemoryStore::new());
    store.insert_venue(venue("v1", "Cue Club", "400 Main St"));
    let directory = VenueDirectory::new(store.clone(), ClaimPolicy::Review);

    let claimed = directory.claim("v1", "u1", "one@example.com").await.unwrap();

    assert_eq!(claimed.verification_status, Some(VerificationStatus::Pending));
}

#[tokio::test]
async fn test_claim_requires_known_venue_and_user() {
    let fx = Fixture::new();
    fx.store.insert_venue(venue("v1", "Cue Club", "400 Main St"));

    let unknown = fx.directory.claim("nope", "u1", "one@example.com").await;
    assert!(matches!(unknown, Err(DeskError::NotFound(_))));

    let anonymous = fx.directory.claim("v1", "", "").await;
    assert!(matches!(anonymous, Err(DeskError::Validation(_))));
}

#[tokio::test]
async fn test_concurrent_claims_have_one_winner() {
    let fx = Fixture::new();
    fx.store.insert_venue(venue("v1", "Cue Club", "400 Main St"));

    let mut handles = Vec::new();
    for i in 0..8 {
        let directory = fx.directory.clone();
        handles.push(tokio::spawn(async move {
            directory
                .claim("v1", &format!("u{}", i), &format!("u{}@example.com", i))
                .await
        }));
    }

    let mut winners = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(DeskError::AlreadyClaimed(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!((winners, rejected), (1, 7));
}

#[tokio::test]
async fn test_search_skips_claimed_and_inactive_venues() {
    let fx = Fixture::new();
    fx.store.insert_venue(venue("v1", "Cue Club", "400 Main St, Seattle"));
    fx.store.insert_venue(venue("v2", "Corner Pocket", "12 Cue Street"));
    let mut closed = venue("v3", "Cue Palace", "1 Closed Rd");
    closed.is_active = false;
    fx.store.insert_venue(closed);
    let mut owned = venue("v4", "Cue Castle", "2 Owned Ave");
    owned.owner_id = Some("someone".to_string());
    fx.store.insert_venue(owned);

    let names: Vec<String> = fx
        .directory
        .search("cue")
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.name)
        .collect();

    assert_eq!(names, vec!["Cue Club", "Corner Pocket"]);
    assert!(fx.directory.search("c").await.unwrap().is_empty());
}
