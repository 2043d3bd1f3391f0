//! Configuration module for the Movie Scraper API
//!
//! Handles loading environment variables and application configuration.

use std::env;

/// Default upstream base URL when BASE_URL is unset or empty
pub const DEFAULT_BASE_URL: &str = "https://bluphim.me";

/// Default provider name when VIDEO_PROVIDER is unset
pub const DEFAULT_PROVIDER: &str = "bluphim";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Base URL of the upstream streaming site
    pub base_url: String,
    /// Active provider name, matched case-insensitively by the factory
    pub provider: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Panics
    /// Panics if PORT is set to a non-numeric value
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            base_url: sanitize_base_url(env::var("BASE_URL").unwrap_or_default()),
            provider: env::var("VIDEO_PROVIDER").unwrap_or_else(|_| DEFAULT_PROVIDER.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: DEFAULT_BASE_URL.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
        }
    }
}

/// Sanitize a configured base URL
///
/// Trims whitespace, strips control characters, and removes trailing slashes
/// so URL builders can safely append path segments. Falls back to
/// [`DEFAULT_BASE_URL`] when the cleaned value is empty.
pub fn sanitize_base_url(raw: impl AsRef<str>) -> String {
    let cleaned: String = raw
        .as_ref()
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let cleaned = cleaned.trim_end_matches('/');

    if cleaned.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        cleaned.to_string()
    }
}
