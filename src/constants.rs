//! Constants module for the Movie Scraper API
//!
//! Contains endpoint URL builders that use the base URL from configuration.

/// Placeholder title used when a card or detail page carries no usable title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Title given to a category-style listing recovered from a homepage
/// that has no recognizable section headers.
pub const FALLBACK_SECTION_TITLE: &str = "Danh sách phim";

/// URL builder functions for all endpoints
pub mod endpoints {
    use once_cell::sync::Lazy;
    use regex::Regex;

    /// Matches an episode segment (`/tap-N`) already present in a content path.
    static EPISODE_SEGMENT_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)/tap-\d+").unwrap());

    /// Home page URL
    pub fn home(base_url: &str) -> String {
        base_url.to_string()
    }

    /// Category listing URL for the given slug and page (1-based).
    ///
    /// Page 1 is the bare category path; later pages use the site's
    /// `/page/{n}/` convention.
    pub fn category(base_url: &str, slug: &str, page: u32) -> String {
        let slug = slug.trim_matches('/');
        if page > 1 {
            format!("{}/{}/page/{}/", base_url, slug, page)
        } else {
            format!("{}/{}/", base_url, slug)
        }
    }

    /// Movie detail URL for a content path, optionally targeting an episode.
    ///
    /// Appends `/tap-{episode}` only when the path does not already encode an
    /// episode segment and the requested episode is greater than zero, then
    /// ensures a single trailing slash.
    pub fn movie(base_url: &str, path: &str, episode: u32) -> String {
        let mut url = format!("{}/{}", base_url, path.trim_matches('/'));
        if episode > 0 && !EPISODE_SEGMENT_RE.is_match(&url) {
            url.push_str(&format!("/tap-{}", episode));
        }
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }

    /// WordPress admin-ajax search URL for the Flatsome live-search action.
    pub fn search(base_url: &str, query: &str) -> String {
        format!(
            "{}/wp-admin/admin-ajax.php?action=flatsome_ajax_search_products&query={}",
            base_url,
            urlencoding::encode(query)
        )
    }
}
