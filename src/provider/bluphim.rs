//! The bluphim.me provider
//!
//! Composes the HTML scraper, the parsers and the AJAX search client
//! into the [`VideoProvider`] operations. Upstream failures are logged
//! with the URL that failed and degrade to `None` or an empty list;
//! callers never see a transport error.

use async_trait::async_trait;

use crate::config::Config;
use crate::constants::endpoints;
use crate::models::{CategoryPage, HomepageData, MovieDetail, NavItem, SearchResult};
use crate::parser;
use crate::scraper::Scraper;
use crate::search::SearchClient;

use super::VideoProvider;

const GENRES: [(&str, &str); 13] = [
    ("Bí Ẩn", "bi-an"),
    ("Chính Kịch", "chinh-kich"),
    ("Cổ Trang", "co-trang"),
    ("Gia Đình", "gia-dinh"),
    ("Hài Hước", "hai-huoc"),
    ("Hành Động", "hanh-dong"),
    ("Hình Sự", "hinh-su"),
    ("Khoa Học", "khoa-hoc"),
    ("Kinh Dị", "kinh-di"),
    ("Phiêu Lưu", "phieu-luu"),
    ("Tâm Lý", "tam-ly"),
    ("Tình Cảm", "tinh-cam"),
    ("Viễn Tưởng", "vien-tuong"),
];

const COUNTRIES: [(&str, &str); 3] = [
    ("Trung Quốc", "country/trung-quoc"),
    ("Hàn Quốc", "country/han-quoc"),
    ("Âu Mỹ", "country/au-my"),
];

/// Scraping provider backed by bluphim.me
pub struct BluphimProvider {
    base_url: String,
    scraper: Scraper,
    search: SearchClient,
}

impl BluphimProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            scraper: Scraper::new(),
            search: SearchClient::new(),
        }
    }

    fn referer(&self) -> String {
        format!("{}/", self.base_url)
    }
}

#[async_trait]
impl VideoProvider for BluphimProvider {
    async fn get_homepage(&self) -> Option<HomepageData> {
        let url = endpoints::home(&self.base_url);

        let html = match self.scraper.fetch_page(&url).await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "homepage fetch failed");
                return None;
            }
        };

        parser::homepage::parse_homepage(&html, &self.base_url)
    }

    async fn get_movie_info(&self, url: &str, episode: u32) -> Option<MovieDetail> {
        let path = url.trim().trim_matches('/');
        if path.is_empty() {
            tracing::warn!("movie info requested with an empty path");
            return None;
        }

        let page_url = endpoints::movie(&self.base_url, path, episode);

        let html = match self
            .scraper
            .fetch_page_referred(&page_url, &self.referer())
            .await
        {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(url = %page_url, error = %err, "movie page fetch failed");
                return None;
            }
        };

        Some(parser::detail::parse_movie_detail(&html, &self.base_url))
    }

    async fn get_category_data(&self, slug: &str, page: u32) -> Option<CategoryPage> {
        let slug = slug.trim().trim_matches('/');
        if slug.is_empty() {
            tracing::warn!("category requested with an empty slug");
            return None;
        }

        let url = endpoints::category(&self.base_url, slug, page);

        let html = match self.scraper.fetch_page(&url).await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "category fetch failed");
                return None;
            }
        };

        parser::category::parse_category_page(&html, &self.base_url)
    }

    async fn get_search(&self, query: &str) -> Vec<SearchResult> {
        self.search.search(&self.base_url, query).await
    }

    async fn get_nav(&self) -> Vec<NavItem> {
        build_nav(&self.base_url)
    }
}

/// Site navigation, mirroring the upstream header menu
///
/// The menu is static upstream, so it is served from this table rather
/// than scraped. URLs are built from the configured base so a mirror
/// domain carries through.
fn build_nav(base_url: &str) -> Vec<NavItem> {
    let page = |slug: &str| format!("{}/{}/", base_url, slug);

    let genres: Vec<NavItem> = GENRES
        .iter()
        .map(|(title, slug)| NavItem::new(*title, page(slug)))
        .collect();

    let countries: Vec<NavItem> = COUNTRIES
        .iter()
        .map(|(title, slug)| NavItem::new(*title, page(slug)))
        .collect();

    vec![
        NavItem::new("Trang Chủ", format!("{}/", base_url)),
        NavItem::with_children("Thể Loại", "#", genres),
        NavItem::with_children("Quốc Gia", "#", countries),
        NavItem::new("Phim bộ", page("phim-bo")),
        NavItem::new("Phim lẻ", page("phim-le")),
        NavItem::new("Phim chiếu rạp", page("phim-chieu-rap")),
        NavItem::new("Hoạt Hình", page("hoat-hinh")),
    ]
}
