//! Data models for the Movie Scraper API
//!
//! This module contains all data structures used throughout the application:
//! the normalized scraping DTOs and the API response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One content card extracted from a listing page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    /// Display title of the movie
    pub title: String,
    /// Upstream-host-relative slug (e.g. "phim-tay-du-ky")
    pub url: String,
    /// Absolute poster image URL
    pub thumbnail: String,
    /// Quality badge text (e.g. "HD"), may be empty
    pub quality: String,
    /// Episode badge text (e.g. "Tập 12"), may be empty
    pub episode: String,
    /// Rating on a 0-10 scale
    pub rating: f64,
    /// Raw view-count label (e.g. "1.2K"), may be empty
    pub view_count: String,
}

/// A titled group of movie cards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieSection {
    /// Section title, unique within one response
    pub title: String,
    /// Cards in document order
    pub data: Vec<MovieSummary>,
}

/// Homepage payload: sections in document order of their headers
pub type HomepageData = Vec<MovieSection>;

/// Pagination state parsed from a listing page's nav-links control
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based)
    pub current_page: u32,
    /// Highest page number seen in the control, at least 1
    pub total_pages: u32,
    /// Previous page, when one exists
    pub prev_page: Option<u32>,
    /// Next page, when one exists
    pub next_page: Option<u32>,
}

/// Category listing payload: a single unnamed card group plus pagination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    /// Zero or one generically-titled sections
    pub data: Vec<MovieSection>,
    /// Pagination control state, absent when the page has none
    pub pagination: Option<Pagination>,
}

/// One episode entry on a movie detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Episode number, always positive
    #[serde(rename = "episode")]
    pub number: u32,
    /// Absolute URL of the episode page
    pub url: String,
    /// Visible label (e.g. "Tập 3"), when one was present
    pub title: Option<String>,
}

/// Movie detail payload for a specific episode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    /// Display title with any episode suffix stripped
    pub title: String,
    /// Absolute poster/social-preview image URL, may be empty
    pub thumbnail: String,
    /// HLS manifest URL, empty when no stream was found on the page
    pub m3u8_url: String,
    /// Episodes sorted ascending by number, unique by number
    pub episodes: Vec<Episode>,
}

/// One live-search suggestion mapped to the normalized shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Suggestion display value
    pub title: String,
    /// Host-relative slug extracted from the suggestion URL
    pub url: String,
    /// Thumbnail URL as provided upstream, may be empty
    pub thumbnail: String,
}

/// One entry of the site navigation tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    /// Menu label
    pub title: String,
    /// Host-relative link target
    pub url: String,
    /// Submenu entries, omitted for leaf items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavItem>>,
}

impl NavItem {
    /// Create a leaf navigation item
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            children: None,
        }
    }

    /// Create a navigation item with a submenu
    pub fn with_children(
        title: impl Into<String>,
        url: impl Into<String>,
        children: Vec<NavItem>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            children: Some(children),
        }
    }
}

/// Generic API response wrapper for successful responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the operation was successful (always true for this type)
    pub success: bool,
    /// The response payload
    pub data: T,
    /// ISO timestamp of when data was fetched
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Create a new successful API response with the current timestamp
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Create a new successful API response with a custom timestamp
    pub fn with_timestamp(data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            timestamp: timestamp.to_rfc3339(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Whether the operation was successful (always false for errors)
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
    /// ISO timestamp of when the error occurred
    pub timestamp: String,
}

impl ApiError {
    /// Create a new API error response with the current timestamp
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Create a new API error response with a custom timestamp
    pub fn with_timestamp(error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: timestamp.to_rfc3339(),
        }
    }
}
