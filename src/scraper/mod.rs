//! Scraper module for fetching HTML content from the upstream site
//!
//! This module provides HTTP client functionality with browser-like headers
//! to fetch pages from the configured streaming site. Fetches are single-shot:
//! a failed request surfaces as an error to the caller, which degrades it to
//! an empty result. Retry policy belongs to the caller, not here.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during scraping operations
#[derive(Error, Debug)]
pub enum ScraperError {
    /// Network-related errors (connection timeout, DNS failure, etc.)
    #[error("Failed to connect to server: {0}")]
    NetworkError(String),

    /// HTTP non-2xx status code errors
    #[error("Server returned status {0}")]
    HttpError(u16),

    /// Error reading response body
    #[error("Failed to read response body: {0}")]
    ResponseError(String),
}

/// Fixed Chrome-like User-Agent sent with every page request
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

const ACCEPT_LANGUAGE: &str = "vi-VN,vi;q=0.9,en-US;q=0.8,en;q=0.7";

/// HTTP client for fetching upstream pages with browser-like headers
pub struct Scraper {
    client: Client,
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new()
    }
}

impl Scraper {
    /// Create a new Scraper with a 30s request timeout
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Fetch a page from the given URL
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        self.request(url, None).await
    }

    /// Fetch a page with an explicit Referer header (used for detail pages)
    pub async fn fetch_page_referred(
        &self,
        url: &str,
        referer: &str,
    ) -> Result<String, ScraperError> {
        self.request(url, Some(referer)).await
    }

    async fn request(&self, url: &str, referer: Option<&str>) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching page");

        let mut request = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT)
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .header("Upgrade-Insecure-Requests", "1");

        if let Some(referer) = referer {
            request = request.header("Referer", referer);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ScraperError::NetworkError("Connection timeout".to_string())
            } else if e.is_connect() {
                ScraperError::NetworkError("Failed to connect to server".to_string())
            } else {
                ScraperError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpError(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ScraperError::ResponseError(e.to_string()))
    }
}
