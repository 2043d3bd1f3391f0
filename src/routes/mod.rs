//! API Routes module for the Movie Scraper API
//!
//! This module contains all HTTP route handlers for the public API endpoints.
//! Handlers are thin: they check the cache, delegate to the configured
//! provider, store the result, and pick the status code. A provider `None`
//! maps to 404, bad input to 400, and list-shaped endpoints always answer
//! 200 with a possibly empty list.

use actix_web::{http::header, web, HttpResponse, HttpResponseBuilder};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::cache::{Cache, CATEGORY_TTL, HOMEPAGE_TTL, MOVIE_TTL, NAV_TTL};
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiError, ApiResponse, CategoryPage, Episode, HomepageData, MovieDetail, MovieSection,
    MovieSummary, NavItem, Pagination, SearchResult,
};
use crate::provider::VideoProvider;

/// Application state shared across handlers
pub struct AppState {
    pub provider: Arc<dyn VideoProvider>,
    pub cache: Arc<dyn Cache>,
}

/// Cache keys for different data types
mod cache_keys {
    pub const HOMEPAGE: &str = "homepage";
    pub const NAV: &str = "nav";

    pub fn movie_info(url: &str, episode: u32) -> String {
        format!("movie:{}:{}", url, episode)
    }

    pub fn category(slug: &str, page: u32) -> String {
        format!("category:{}:{}", slug, page)
    }
}

/// 200 response builder carrying a public max-age matching the cache TTL
fn cacheable_ok(ttl: Duration) -> HttpResponseBuilder {
    let mut response = HttpResponse::Ok();
    response.insert_header((
        header::CACHE_CONTROL,
        format!("public, max-age={}", ttl.as_secs()),
    ));
    response
}

/// GET /api/movies/homepage - Get homepage movie sections
///
/// Returns cached data if fresh (< 5 minutes old), otherwise scrapes fresh data.
#[utoipa::path(
    get,
    path = "/api/movies/homepage",
    tag = "movies",
    responses(
        (status = 200, description = "Homepage sections retrieved successfully", body = Vec<MovieSection>),
        (status = 404, description = "Homepage data could not be fetched", body = ApiError)
    )
)]
pub async fn get_homepage(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    if let Some(cached) = data.cache.get_json::<HomepageData>(cache_keys::HOMEPAGE) {
        info!("Returning cached homepage");
        return Ok(cacheable_ok(HOMEPAGE_TTL).json(ApiResponse::new(cached)));
    }

    info!("Scraping fresh homepage data");
    match data.provider.get_homepage().await {
        Some(sections) => {
            data.cache
                .put_json(cache_keys::HOMEPAGE, &sections, HOMEPAGE_TTL);
            Ok(cacheable_ok(HOMEPAGE_TTL).json(ApiResponse::new(sections)))
        }
        None => Err(AppError::not_found("Could not fetch homepage data")),
    }
}

/// Query parameters for the movie info endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MovieInfoQuery {
    /// Movie path on the upstream site (required)
    pub url: Option<String>,
    /// Episode number (default: 1)
    pub episode: Option<u32>,
}

/// GET /api/movies/info - Get movie detail with playlist and episodes
///
/// Query parameters: url (required) - movie path; episode - episode number (default: 1)
#[utoipa::path(
    get,
    path = "/api/movies/info",
    tag = "movies",
    params(MovieInfoQuery),
    responses(
        (status = 200, description = "Movie info retrieved successfully", body = MovieDetail),
        (status = 400, description = "Bad request - url is required", body = ApiError),
        (status = 404, description = "Movie info could not be fetched", body = ApiError)
    )
)]
pub async fn get_movie_info(
    data: web::Data<AppState>,
    query: web::Query<MovieInfoQuery>,
) -> AppResult<HttpResponse> {
    let url = match &query.url {
        Some(url) if !url.trim().is_empty() => url.trim(),
        _ => return Err(AppError::validation("URL is required")),
    };
    let episode = query.episode.unwrap_or(1);

    let cache_key = cache_keys::movie_info(url, episode);
    if let Some(cached) = data.cache.get_json::<MovieDetail>(&cache_key) {
        info!("Returning cached movie info for: {}", url);
        return Ok(cacheable_ok(MOVIE_TTL).json(ApiResponse::new(cached)));
    }

    info!("Scraping movie info for: {}", url);
    match data.provider.get_movie_info(url, episode).await {
        Some(detail) => {
            data.cache.put_json(&cache_key, &detail, MOVIE_TTL);
            Ok(cacheable_ok(MOVIE_TTL).json(ApiResponse::new(detail)))
        }
        None => Err(AppError::not_found("Could not fetch movie info")),
    }
}

/// Query parameters for the category endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CategoryQuery {
    /// Page number (default: 1)
    pub page: Option<u32>,
}

/// GET /api/movies/category/{slug} - Get one page of a category listing
///
/// Query parameter: page - page number (default: 1)
#[utoipa::path(
    get,
    path = "/api/movies/category/{slug}",
    tag = "movies",
    params(
        ("slug" = String, Path, description = "Category slug identifier"),
        CategoryQuery
    ),
    responses(
        (status = 200, description = "Category page retrieved successfully", body = CategoryPage),
        (status = 404, description = "Category data could not be fetched", body = ApiError)
    )
)]
pub async fn get_category(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<CategoryQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let page = query.page.unwrap_or(1).max(1);

    let cache_key = cache_keys::category(&slug, page);
    if let Some(cached) = data.cache.get_json::<CategoryPage>(&cache_key) {
        info!("Returning cached category page for: {}", slug);
        return Ok(cacheable_ok(CATEGORY_TTL).json(ApiResponse::new(cached)));
    }

    info!("Scraping category {} page {}", slug, page);
    match data.provider.get_category_data(&slug, page).await {
        Some(category) => {
            data.cache.put_json(&cache_key, &category, CATEGORY_TTL);
            Ok(cacheable_ok(CATEGORY_TTL).json(ApiResponse::new(category)))
        }
        None => Err(AppError::not_found("Could not fetch category data")),
    }
}

/// Query parameters for the search endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Search keyword
    pub q: Option<String>,
}

/// GET /api/movies/search - Search for movies
///
/// Query parameter: q (required) - search keyword. Results are not cached;
/// queries shorter than two characters yield an empty list.
#[utoipa::path(
    get,
    path = "/api/movies/search",
    tag = "movies",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results retrieved successfully", body = Vec<SearchResult>),
        (status = 400, description = "Bad request - search query is required", body = ApiError)
    )
)]
pub async fn search_movies(
    data: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let keyword = match &query.q {
        Some(q) if !q.trim().is_empty() => q.trim(),
        _ => return Err(AppError::validation("Search query is required")),
    };

    info!("Searching for movies: {}", keyword);
    let results = data.provider.get_search(keyword).await;
    Ok(HttpResponse::Ok().json(ApiResponse::new(results)))
}

/// GET /api/nav - Get the site navigation tree
///
/// Also served at /nav for older clients.
#[utoipa::path(
    get,
    path = "/api/nav",
    tag = "navigation",
    responses(
        (status = 200, description = "Navigation tree retrieved successfully", body = Vec<NavItem>)
    )
)]
pub async fn get_nav(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    if let Some(cached) = data.cache.get_json::<Vec<NavItem>>(cache_keys::NAV) {
        return Ok(cacheable_ok(NAV_TTL).json(ApiResponse::new(cached)));
    }

    let nav = data.provider.get_nav().await;
    if !nav.is_empty() {
        data.cache.put_json(cache_keys::NAV, &nav, NAV_TTL);
    }
    Ok(cacheable_ok(NAV_TTL).json(ApiResponse::new(nav)))
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movie Scraper API",
        version = "0.1.0",
        description = "API for scraping and accessing movie data from bluphim.me",
        contact(
            name = "API Support",
            url = "https://github.com/yourusername/movie-scraper"
        ),
        license(
            name = "MIT"
        )
    ),
    paths(
        get_homepage,
        get_movie_info,
        get_category,
        search_movies,
        get_nav
    ),
    components(
        schemas(
            MovieSummary,
            MovieSection,
            Pagination,
            CategoryPage,
            Episode,
            MovieDetail,
            SearchResult,
            NavItem,
            ApiError,
            MovieInfoQuery,
            CategoryQuery,
            SearchQuery
        )
    ),
    tags(
        (name = "movies", description = "Movie data endpoints"),
        (name = "navigation", description = "Site navigation endpoints")
    )
)]
pub struct ApiDoc;

/// Configure API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/movies/homepage", web::get().to(get_homepage))
            .route("/movies/info", web::get().to(get_movie_info))
            .route("/movies/category/{slug}", web::get().to(get_category))
            .route("/movies/search", web::get().to(search_movies))
            .route("/nav", web::get().to(get_nav)),
    )
    .route("/nav", web::get().to(get_nav));
}
