//! Email and password sign-in backed by Argon2 hashes.
//!
//! Credentials live in whichever store implements [`CredentialStore`];
//! sessions are opaque bearer tokens held in process.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use cuefinder_core::auth::{AuthIdentity, AuthProvider, AuthSession, SessionEvent};
use cuefinder_core::errors::{DeskError, DeskResult};
use eyre::Result;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;
const SESSION_TOKEN_LEN: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stores a new credential. Returns `None` when the email is taken.
    async fn insert_credential(&self, credential: &Credential) -> DeskResult<Option<Credential>>;

    async fn find_credential(&self, email: &str) -> DeskResult<Option<Credential>>;
}

/// Hashes a password with a fresh random salt. The result is a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub struct PasswordAuthProvider {
    credentials: Arc<dyn CredentialStore>,
    sessions: RwLock<HashMap<String, AuthIdentity>>,
    events: broadcast::Sender<SessionEvent>,
}

impl PasswordAuthProvider {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            credentials,
            sessions: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn open_session(&self, identity: AuthIdentity) -> AuthSession {
        let token = new_session_token();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), identity.clone());
        // No listeners is fine.
        let _ = self.events.send(SessionEvent::SignedIn(identity.clone()));

        AuthSession { token, identity }
    }
}

#[async_trait]
impl AuthProvider for PasswordAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> DeskResult<AuthSession> {
        let email = normalize_email(email);
        let rejected = || DeskError::Authentication("Invalid email or password".to_string());

        let credential = self
            .credentials
            .find_credential(&email)
            .await?
            .ok_or_else(rejected)?;
        if !verify_password(password, &credential.password_hash)? {
            debug!("Password mismatch for {}", email);
            return Err(rejected());
        }

        Ok(self.open_session(AuthIdentity {
            user_id: credential.user_id,
            email: credential.email,
        }))
    }

    async fn sign_up(&self, email: &str, password: &str) -> DeskResult<AuthSession> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(DeskError::Validation(format!("Invalid email address: {}", email)));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DeskError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let credential = Credential {
            user_id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash: hash_password(password)?,
        };
        let stored = self
            .credentials
            .insert_credential(&credential)
            .await?
            .ok_or_else(|| {
                DeskError::Validation(format!("An account already exists for {}", email))
            })?;
        info!("Created credentials for {}", stored.email);

        Ok(self.open_session(AuthIdentity {
            user_id: stored.user_id,
            email: stored.email,
        }))
    }

    async fn sign_out(&self, token: &str) -> DeskResult<()> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
        if let Some(identity) = removed {
            debug!("Session closed for {}", identity.email);
            let _ = self.events.send(SessionEvent::SignedOut(identity));
        }
        Ok(())
    }

    async fn current_session(&self, token: &str) -> DeskResult<Option<AuthSession>> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(sessions.get(token).map(|identity| AuthSession {
            token: token.to_string(),
            identity: identity.clone(),
        }))
    }

    fn session_changes(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
