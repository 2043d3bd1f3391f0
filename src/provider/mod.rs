//! Swappable video-source providers
//!
//! All content endpoints go through the [`VideoProvider`] trait so the
//! upstream site can be swapped by configuration without touching the
//! HTTP layer. `bluphim` is the only provider today and also serves as
//! the fallback for unknown names.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{CategoryPage, HomepageData, MovieDetail, NavItem, SearchResult};

pub mod bluphim;

pub use bluphim::BluphimProvider;

/// A scrapeable video source
///
/// Content lookups return `None` for "not found or unreachable".
/// Search and navigation have no not-found state and degrade to empty
/// lists instead.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Homepage sections
    async fn get_homepage(&self) -> Option<HomepageData>;

    /// Detail page for a movie path, positioned on the given episode
    async fn get_movie_info(&self, url: &str, episode: u32) -> Option<MovieDetail>;

    /// One page of a category listing
    async fn get_category_data(&self, slug: &str, page: u32) -> Option<CategoryPage>;

    /// Live-search suggestions
    async fn get_search(&self, query: &str) -> Vec<SearchResult>;

    /// Site navigation tree
    async fn get_nav(&self) -> Vec<NavItem>;
}

/// Build the provider named by the configuration
///
/// Provider names match case-insensitively; an unknown name falls back
/// to the default provider rather than failing startup.
pub fn create_provider(config: &Config) -> Arc<dyn VideoProvider> {
    match config.provider.to_lowercase().as_str() {
        "bluphim" => Arc::new(BluphimProvider::new(config)),
        other => {
            tracing::warn!(provider = other, "unknown provider, falling back to bluphim");
            Arc::new(BluphimProvider::new(config))
        }
    }
}
