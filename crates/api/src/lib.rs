//! # CueFinder API
//!
//! HTTP surface of the venue dashboard: owner sign-in, venue search and
//! claiming, booking and table management, and the live dashboard that
//! reconciles table occupancy against the booking list.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into calls on the core repositories
//! - **Middleware**: Bearer sessions and error mapping
//! - **Config**: Environment and application configuration
//!
//! The server runs against Postgres in live mode or a seeded in-memory
//! store in demo mode; handlers never see the difference.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, http::HeaderValue, Router};
use chrono::Utc;
use chrono_tz::Tz;
use cuefinder_core::{
    auth::DashboardAuth,
    directory::VenueDirectory,
    models::venue::Venue,
    repository::{BookingRepository, TableRepository},
    store::{BookingStore, ChangeFeed, TableStore, UserStore, VenueStore},
};
use cuefinder_db::{
    auth::{CredentialStore, PasswordAuthProvider},
    create_pool, demo,
    memory::MemoryStore,
    schema::initialize_database,
    store::PgStore,
};
use eyre::{eyre, Result};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::config::{ApiConfig, AppMode};

/// Shared application state handed to every request handler.
pub struct ApiState {
    pub bookings: BookingRepository,
    pub tables: TableRepository,
    pub directory: VenueDirectory,
    pub auth: DashboardAuth,
    /// Used for venues whose own timezone cannot be parsed.
    pub default_timezone: Tz,
    pub mode: AppMode,
}

impl ApiState {
    /// Wires every repository onto one backing store.
    pub fn from_store<S>(store: Arc<S>, config: &ApiConfig) -> Self
    where
        S: BookingStore
            + TableStore
            + VenueStore
            + UserStore
            + CredentialStore
            + ChangeFeed
            + 'static,
    {
        let provider = Arc::new(PasswordAuthProvider::new(store.clone()));

        Self {
            bookings: BookingRepository::new(store.clone(), store.clone()),
            tables: TableRepository::new(store.clone(), store.clone()),
            directory: VenueDirectory::new(store.clone(), config.claim_policy),
            auth: DashboardAuth::new(provider, store.clone(), store),
            default_timezone: config.default_timezone,
            mode: config.mode,
        }
    }

    /// The timezone a venue's days and hours are counted in.
    pub fn timezone_for(&self, venue: &Venue) -> Tz {
        Tz::from_str(&venue.timezone).unwrap_or_else(|_| {
            warn!(
                "Venue {} has unknown timezone {:?}, using {}",
                venue.id, venue.timezone, self.default_timezone
            );
            self.default_timezone
        })
    }
}

/// Builds the state for the configured mode.
///
/// Demo mode seeds an in-memory store with the demo venue; live mode
/// connects to Postgres, creates the schema and starts the change listener.
pub async fn build_state(config: &ApiConfig) -> Result<Arc<ApiState>> {
    match config.mode {
        AppMode::Demo => {
            let store = Arc::new(MemoryStore::new());
            let data = demo::dataset(Utc::now())?;
            demo::load_into_memory(&store, &data)?;
            info!(
                "Demo mode: seeded {} venues, {} tables and {} bookings",
                data.venues.len(),
                data.tables.len(),
                data.bookings.len()
            );
            Ok(Arc::new(ApiState::from_store(store, config)))
        }
        AppMode::Live => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL is required in live mode"))?;
            let pool = create_pool(database_url).await?;
            initialize_database(&pool).await?;
            let store = Arc::new(PgStore::connect(pool).await?);
            info!("Live mode: connected to Postgres");
            Ok(Arc::new(ApiState::from_store(store, config)))
        }
    }
}

/// Installs the global tracing subscriber.
pub fn init_tracing(config: &ApiConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Assembles every route with the shared middleware stack.
pub fn build_router(state: Arc<ApiState>, config: &ApiConfig) -> Router {
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Owner sign-in and session endpoints
        .merge(routes::auth::routes())
        // Venue search and claiming
        .merge(routes::venues::routes())
        // Booking list, live feed and status changes
        .merge(routes::bookings::routes())
        // Table list, free tables and operator overrides
        .merge(routes::tables::routes())
        // Reconciled dashboard and analytics
        .merge(routes::dashboard::routes())
        .with_state(state);

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(
                middleware::error_handling::handle_middleware_error,
            ))
            .timeout(Duration::from_secs(config.request_timeout)),
    )
    .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until the process exits.
pub async fn start_server(config: ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = build_router(state, &config);

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{} ({:?} mode)", addr, config.mode);
    axum::serve(listener, app).await?;

    Ok(())
}
