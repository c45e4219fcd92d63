//! Dashboard sign-in gate on top of an external auth provider.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::errors::{DeskError, DeskResult};
use crate::models::user::{DashboardAccess, User, UserRole};
use crate::models::venue::{ClaimPolicy, VenueClaim};
use crate::store::{UserStore, VenueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub identity: AuthIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(AuthIdentity),
    SignedOut(AuthIdentity),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> DeskResult<AuthSession>;

    /// Creates credentials and signs the new identity in.
    async fn sign_up(&self, email: &str, password: &str) -> DeskResult<AuthSession>;

    async fn sign_out(&self, token: &str) -> DeskResult<()>;

    async fn current_session(&self, token: &str) -> DeskResult<Option<AuthSession>>;

    fn session_changes(&self) -> broadcast::Receiver<SessionEvent>;
}

/// A signed-in venue owner.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSession {
    pub token: String,
    pub user: User,
    pub access: DashboardAccess,
}

impl DashboardSession {
    pub fn needs_venue_claim(&self) -> bool {
        self.access == DashboardAccess::NeedsVenueClaim
    }

    /// The single owner check guarding every venue-scoped operation.
    pub fn authorize_venue(&self, venue_id: &str) -> DeskResult<()> {
        if self.user.owns(venue_id) {
            Ok(())
        } else {
            Err(DeskError::AccessDenied(format!(
                "Venue {} is not associated with this account",
                venue_id
            )))
        }
    }
}

#[derive(Clone)]
pub struct DashboardAuth {
    provider: Arc<dyn AuthProvider>,
    users: Arc<dyn UserStore>,
    venues: Arc<dyn VenueStore>,
}

impl DashboardAuth {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        users: Arc<dyn UserStore>,
        venues: Arc<dyn VenueStore>,
    ) -> Self {
        Self {
            provider,
            users,
            venues,
        }
    }

    pub fn provider(&self) -> &Arc<dyn AuthProvider> {
        &self.provider
    }

    /// Signs in and checks the account may use the dashboard. Accounts
    /// that may not are signed out again before the error is returned.
    pub async fn sign_in(&self, email: &str, password: &str) -> DeskResult<DashboardSession> {
        let session = self.provider.sign_in(email, password).await?;
        match self.open_session(&session).await {
            Ok(dashboard) => {
                info!("Dashboard session opened for {}", session.identity.email);
                Ok(dashboard)
            }
            Err(err) => {
                warn!("Rejecting sign-in for {}: {}", session.identity.email, err);
                self.provider.sign_out(&session.token).await?;
                Err(err)
            }
        }
    }

    /// Registers a venue owner together with the venue they manage. The
    /// claim goes through review. If another owner claims the venue between
    /// the availability check and the claim, the account is still created
    /// and the returned session reports [`DashboardAccess::NeedsVenueClaim`].
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        venue_id: &str,
    ) -> DeskResult<DashboardSession> {
        let venue = self
            .venues
            .get_venue(venue_id)
            .await?
            .ok_or_else(|| DeskError::NotFound(format!("Venue with ID {} not found", venue_id)))?;
        if venue.is_claimed() {
            return Err(DeskError::AlreadyClaimed(venue.id));
        }

        let session = self.provider.sign_up(email, password).await?;
        let profile = User {
            id: session.identity.user_id.clone(),
            email: session.identity.email.clone(),
            display_name: venue.name.clone(),
            role: UserRole::VenueOwner,
            owned_venue_ids: Vec::new(),
            created_at: Utc::now(),
        };
        self.users.put_user(&profile).await?;

        let claim = VenueClaim {
            user_id: profile.id.clone(),
            user_email: profile.email.clone(),
            verification_status: ClaimPolicy::Review.verification_status(),
            claimed_at: Utc::now(),
        };
        match self.venues.claim_venue(venue_id, &claim).await {
            Ok(_) => info!("Venue owner {} registered for venue {}", profile.email, venue_id),
            // The account exists at this point; the owner continues through
            // the claim flow with a NeedsVenueClaim session.
            Err(DeskError::AlreadyClaimed(id)) => warn!(
                "Venue {} was claimed while {} registered; account has no venue",
                id, profile.email
            ),
            Err(err) => return Err(err),
        }

        self.open_session(&session).await
    }

    /// Rebuilds the dashboard session behind a bearer token. A token whose
    /// user may no longer use the dashboard is signed out.
    pub async fn resume(&self, token: &str) -> DeskResult<DashboardSession> {
        let session = self
            .provider
            .current_session(token)
            .await?
            .ok_or_else(|| DeskError::Authentication("Session expired or unknown".to_string()))?;
        match self.open_session(&session).await {
            Err(err @ (DeskError::AccessDenied(_) | DeskError::NotFound(_))) => {
                warn!("Ending session for {}: {}", session.identity.email, err);
                self.provider.sign_out(token).await?;
                Err(err)
            }
            result => result,
        }
    }

    pub async fn sign_out(&self, token: &str) -> DeskResult<()> {
        self.provider.sign_out(token).await
    }

    async fn open_session(&self, session: &AuthSession) -> DeskResult<DashboardSession> {
        let user = self
            .users
            .get_user(&session.identity.user_id)
            .await?
            .ok_or_else(|| DeskError::NotFound("User data not found".to_string()))?;
        let access = user.dashboard_access()?;

        Ok(DashboardSession {
            token: session.token.clone(),
            user,
            access,
        })
    }
}
