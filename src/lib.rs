//! Movie Scraper API Library
//!
//! This library scrapes movie data from bluphim.me (homepage sections,
//! category listings, movie details with HLS playlists, live search) and
//! exposes it through REST API endpoints behind a swappable provider.

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod provider;
pub mod routes;
pub mod scraper;
pub mod search;
