//! Search client for the upstream AJAX suggestion endpoint
//!
//! The site exposes its live-search box through the WordPress
//! admin-ajax endpoint rather than a crawlable results page, so search
//! speaks JSON instead of going through the HTML parsers. Results
//! degrade to an empty list on any upstream failure.

use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::models::SearchResult;
use crate::scraper::USER_AGENT;

/// Queries shorter than this (in characters, after trimming) are
/// answered locally with an empty list
const MIN_QUERY_CHARS: usize = 2;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to reach search endpoint: {0}")]
    NetworkError(String),

    #[error("Search endpoint returned status {0}")]
    HttpError(u16),

    #[error("Unreadable search response: {0}")]
    ResponseError(String),
}

#[derive(Debug, Deserialize)]
struct FlatsomeSearchResponse {
    #[serde(default)]
    suggestions: Vec<FlatsomeSuggestion>,
}

#[derive(Debug, Deserialize)]
struct FlatsomeSuggestion {
    #[serde(default)]
    value: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    img: String,
}

/// HTTP client for the upstream search endpoint
pub struct SearchClient {
    client: Client,
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Run a suggestion query against the upstream search endpoint
    ///
    /// Queries shorter than two characters return an empty list without
    /// any network traffic, matching the behaviour of the site's own
    /// search box. Upstream failures are logged and also answered with
    /// an empty list; search has no "not found" state.
    pub async fn search(&self, base_url: &str, query: &str) -> Vec<SearchResult> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.request(base_url, trimmed).await {
            Ok(results) => results,
            Err(SearchError::HttpError(status)) => {
                tracing::warn!(status, "search endpoint rejected the request");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "search request failed");
                Vec::new()
            }
        }
    }

    async fn request(
        &self,
        base_url: &str,
        query: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let url = crate::constants::endpoints::search(base_url, query);

        tracing::debug!(url = %url, "querying search endpoint");

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::REFERER, format!("{}/", base_url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::NetworkError("Connection timeout".to_string())
                } else if e.is_connect() {
                    SearchError::NetworkError("Failed to connect to server".to_string())
                } else {
                    SearchError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpError(status.as_u16()));
        }

        let payload: FlatsomeSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ResponseError(e.to_string()))?;

        Ok(payload
            .suggestions
            .into_iter()
            .filter_map(suggestion_into_result)
            .collect())
    }
}

/// Map one upstream suggestion onto a search result
///
/// Suggestions without a title or link are dropped, as are ones whose
/// link does not parse as a URL. The link is reduced to its path slug;
/// a link pointing at the site root keeps the suggestion with an empty
/// slug. Thumbnails are passed through exactly as the endpoint sent
/// them.
fn suggestion_into_result(suggestion: FlatsomeSuggestion) -> Option<SearchResult> {
    if suggestion.url.is_empty() || suggestion.value.is_empty() {
        return None;
    }

    let parsed = Url::parse(&suggestion.url).ok()?;
    let slug = parsed.path().trim_matches('/').to_string();

    Some(SearchResult {
        title: suggestion.value,
        url: slug,
        thumbnail: suggestion.img,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://bluphim.me";

    fn suggestion(value: &str, url: &str, img: &str) -> FlatsomeSuggestion {
        FlatsomeSuggestion {
            value: value.to_string(),
            url: url.to_string(),
            img: img.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_search_short_query_skips_network() {
        let client = SearchClient::new();
        assert!(client.search(BASE, "a").await.is_empty());
        assert!(client.search(BASE, "  x  ").await.is_empty());
        assert!(client.search(BASE, "").await.is_empty());
    }

    #[test]
    fn test_suggestion_maps_to_slug() {
        let result = suggestion_into_result(suggestion(
            "Tây Du Ký",
            "https://bluphim.me/phim-tay-du-ky/",
            "//img.example/t.jpg",
        ))
        .unwrap();

        assert_eq!(result.title, "Tây Du Ký");
        assert_eq!(result.url, "phim-tay-du-ky");
        // Thumbnails come back exactly as sent, protocol-relative or not.
        assert_eq!(result.thumbnail, "//img.example/t.jpg");
    }

    #[test]
    fn test_suggestion_without_link_or_title_is_dropped() {
        assert!(suggestion_into_result(suggestion("", "https://bluphim.me/x/", "")).is_none());
        assert!(suggestion_into_result(suggestion("Phim X", "", "")).is_none());
    }

    #[test]
    fn test_suggestion_with_unparsable_link_is_dropped() {
        assert!(suggestion_into_result(suggestion("Phim X", "not a url", "")).is_none());
    }

    #[test]
    fn test_suggestion_pointing_at_site_root_keeps_empty_slug() {
        let result =
            suggestion_into_result(suggestion("Trang chủ", "https://bluphim.me/", "")).unwrap();
        assert_eq!(result.url, "");
    }

    #[test]
    fn test_response_deserializes_with_missing_fields() {
        let payload: FlatsomeSearchResponse = serde_json::from_str(
            r#"{"suggestions":[{"type":"product","id":12,"value":"Phim A","url":"https://bluphim.me/phim-a/"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.suggestions.len(), 1);
        assert_eq!(payload.suggestions[0].img, "");

        let empty: FlatsomeSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.suggestions.is_empty());
    }
}
