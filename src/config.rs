//! Application configuration loaded from environment variables.

use std::env;

/// Default search radius for nearby-court discovery, in meters.
const DEFAULT_SEARCH_RADIUS_METERS: f64 = 5_000.0;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Google Places API key
    pub places_api_key: String,
    /// Search radius used when the caller does not supply one
    pub default_search_radius_meters: f64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            places_api_key: "test_places_key".to_string(),
            default_search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            places_api_key: env::var("PLACES_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PLACES_API_KEY"))?,
            default_search_radius_meters: env::var("SEARCH_RADIUS_METERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_RADIUS_METERS),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
