//! # API Configuration Module
//!
//! Loads the dashboard server configuration from environment variables.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `CUEFINDER_MODE`: `live` (Postgres, default) or `demo` (seeded in-memory data)
//! - `DATABASE_URL`: PostgreSQL connection string (required in live mode)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `CLAIM_AUTO_VERIFY`: Whether venue claims are verified immediately (default: true)
//! - `VENUE_TIMEZONE`: Fallback timezone for venues without a valid one (default: "UTC")

use std::env;
use std::str::FromStr;

use chrono_tz::Tz;
use cuefinder_core::models::venue::ClaimPolicy;
use eyre::{eyre, Result, WrapErr};
use tracing::Level;

/// Which store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Live,
    Demo,
}

impl FromStr for AppMode {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(AppMode::Live),
            "demo" => Ok(AppMode::Demo),
            other => Err(eyre!("Invalid CUEFINDER_MODE value: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub mode: AppMode,
    /// Only read in live mode.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub cors_origins: Option<Vec<String>>,
    /// Request timeout in seconds
    pub request_timeout: u64,
    pub claim_policy: ClaimPolicy,
    pub default_timezone: Tz,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            mode: AppMode::Demo,
            database_url: None,
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            claim_policy: ClaimPolicy::AutoVerify,
            default_timezone: Tz::UTC,
        }
    }
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(eyre!("Invalid boolean value: {}", other)),
    }
}

impl ApiConfig {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// - `DATABASE_URL` is missing in live mode
    /// - `API_PORT`, `CUEFINDER_MODE`, `CLAIM_AUTO_VERIFY` or
    ///   `VENUE_TIMEZONE` cannot be parsed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Backend selection
        let mode: AppMode = env::var("CUEFINDER_MODE")
            .unwrap_or_else(|_| "live".to_string())
            .parse()?;
        let database_url = env::var("DATABASE_URL").ok();
        if mode == AppMode::Live && database_url.is_none() {
            return Err(eyre!("DATABASE_URL environment variable must be set in live mode"));
        }

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Venue rules
        let claim_policy = match env::var("CLAIM_AUTO_VERIFY") {
            Ok(value) if !parse_flag(&value).wrap_err("Invalid CLAIM_AUTO_VERIFY value")? => {
                ClaimPolicy::Review
            }
            _ => ClaimPolicy::AutoVerify,
        };
        let default_timezone = match env::var("VENUE_TIMEZONE") {
            Ok(name) => Tz::from_str(&name).map_err(|e| eyre!("Invalid VENUE_TIMEZONE value {}: {}", name, e))?,
            Err(_) => Tz::UTC,
        };

        Ok(Self {
            host,
            port,
            mode,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            claim_policy,
            default_timezone,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes_and_flags() {
        assert_eq!("Demo".parse::<AppMode>().unwrap(), AppMode::Demo);
        assert!("staging".parse::<AppMode>().is_err());
        assert!(parse_flag("yes").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("loud"), Level::INFO);
    }
}
