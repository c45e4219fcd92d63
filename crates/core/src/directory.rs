use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::{DeskError, DeskResult};
use crate::models::venue::{ClaimPolicy, Venue, VenueClaim};
use crate::search::{rank_venues, MIN_SEARCH_TERM_LEN};
use crate::store::VenueStore;

/// How many active venues a search scans before ranking.
pub const SEARCH_SCAN_LIMIT: usize = 100;

/// Search and claim operations over venue records.
#[derive(Clone)]
pub struct VenueDirectory {
    venues: Arc<dyn VenueStore>,
    policy: ClaimPolicy,
}

impl VenueDirectory {
    pub fn new(venues: Arc<dyn VenueStore>, policy: ClaimPolicy) -> Self {
        Self { venues, policy }
    }

    pub fn policy(&self) -> ClaimPolicy {
        self.policy
    }

    /// Unclaimed venues whose name or address contains `term`, best first.
    pub async fn search(&self, term: &str) -> DeskResult<Vec<Venue>> {
        if term.trim().chars().count() < MIN_SEARCH_TERM_LEN {
            return Ok(Vec::new());
        }

        let candidates: Vec<Venue> = self
            .venues
            .list_active_venues(SEARCH_SCAN_LIMIT)
            .await?
            .into_iter()
            .filter(|venue| !venue.is_claimed())
            .collect();

        let results = rank_venues(candidates, term);
        debug!("Venue search for {:?} matched {} venues", term, results.len());
        Ok(results)
    }

    pub async fn get_venue(&self, venue_id: &str) -> DeskResult<Venue> {
        self.venues
            .get_venue(venue_id)
            .await?
            .ok_or_else(|| DeskError::NotFound(format!("Venue with ID {} not found", venue_id)))
    }

    /// Records `user_id` as the owner of an unclaimed venue.
    pub async fn claim(&self, venue_id: &str, user_id: &str, user_email: &str) -> DeskResult<Venue> {
        self.claim_with(venue_id, user_id, user_email, self.policy).await
    }

    pub async fn claim_with(
        &self,
        venue_id: &str,
        user_id: &str,
        user_email: &str,
        policy: ClaimPolicy,
    ) -> DeskResult<Venue> {
        if user_id.is_empty() {
            return Err(DeskError::Validation("A user is required to claim a venue".to_string()));
        }

        let claim = VenueClaim {
            user_id: user_id.to_string(),
            user_email: user_email.to_string(),
            verification_status: policy.verification_status(),
            claimed_at: Utc::now(),
        };

        let venue = self.venues.claim_venue(venue_id, &claim).await?;
        info!(
            "Venue {} claimed by {} ({})",
            venue.id,
            user_id,
            claim.verification_status.as_str()
        );
        Ok(venue)
    }
}
