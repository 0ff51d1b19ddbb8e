use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub appview: AppViewConfig,
    #[serde(default)]
    pub feed: FeedSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Identity of the feed generator itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// DID that publishes the feed records (owner of the feed AT-URIs)
    pub publisher_did: String,
    /// DID of this service (normally `did:web:<hostname>`)
    pub service_did: String,
    /// Public hostname the service is reachable at
    pub hostname: String,
}

/// Upstream AppView / PDS connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppViewConfig {
    pub service_url: String,
    /// Handle or DID used for the one-time session login. When unset the
    /// client runs unauthenticated against a public AppView.
    pub identifier: Option<String>,
    pub app_password: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Tunables of the aggregation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Maximum simultaneous outstanding author-feed fetches
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    /// How many recent like records to scan per request
    #[serde(default = "default_interaction_scan_limit")]
    pub interaction_scan_limit: i64,
    /// Items requested from the source per target
    #[serde(default = "default_fetch_page_limit")]
    pub fetch_page_limit: u32,
    /// Window for likes received by the requester (likes-back variant)
    #[serde(default = "default_likes_back_window_hours")]
    pub likes_back_window_hours: i64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
            interaction_scan_limit: default_interaction_scan_limit(),
            fetch_page_limit: default_fetch_page_limit(),
            likes_back_window_hours: default_likes_back_window_hours(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let hostname =
            std::env::var("FEEDGEN_HOSTNAME").unwrap_or_else(|_| "example.com".to_string());
        let service_did = std::env::var("FEEDGEN_SERVICE_DID")
            .unwrap_or_else(|_| format!("did:web:{}", hostname));
        let publisher_did = std::env::var("FEEDGEN_PUBLISHER_DID")
            .map_err(|_| AppError::Config("FEEDGEN_PUBLISHER_DID must be set".to_string()))?;

        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                port: parse_env("APP_PORT", 8000)?,
                log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .map_err(|_| AppError::Config("DATABASE_URL must be set".to_string()))?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            identity: IdentityConfig {
                publisher_did,
                service_did,
                hostname,
            },
            appview: AppViewConfig {
                service_url: std::env::var("APPVIEW_SERVICE_URL")
                    .unwrap_or_else(|_| "https://bsky.social".to_string()),
                identifier: std::env::var("APPVIEW_IDENTIFIER").ok().filter(|v| !v.is_empty()),
                app_password: std::env::var("APPVIEW_APP_PASSWORD")
                    .ok()
                    .filter(|v| !v.is_empty()),
                request_timeout_secs: parse_env(
                    "APPVIEW_REQUEST_TIMEOUT_SECS",
                    default_request_timeout_secs(),
                )?,
            },
            feed: FeedSettings {
                fetch_concurrency: parse_env("FEED_FETCH_CONCURRENCY", default_fetch_concurrency())?,
                interaction_scan_limit: parse_env(
                    "FEED_INTERACTION_SCAN_LIMIT",
                    default_interaction_scan_limit(),
                )?,
                fetch_page_limit: parse_env("FEED_FETCH_PAGE_LIMIT", default_fetch_page_limit())?,
                likes_back_window_hours: parse_env(
                    "FEED_LIKES_BACK_WINDOW_HOURS",
                    default_likes_back_window_hours(),
                )?,
            },
        })
    }

    pub fn is_development(&self) -> bool {
        self.app.env == "development"
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("invalid value for {}", key))),
        Err(_) => Ok(default),
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_fetch_concurrency() -> usize {
    10
}

fn default_interaction_scan_limit() -> i64 {
    100
}

fn default_fetch_page_limit() -> u32 {
    100
}

fn default_likes_back_window_hours() -> i64 {
    24
}
