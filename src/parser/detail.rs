//! Movie detail parser
//!
//! Detail pages embed the HLS playlist URL somewhere in inline player
//! scripts, and the exact shape varies by player revision. Extraction
//! runs an ordered list of strategies and returns the first hit, so a
//! site-side player change degrades to the next strategy instead of
//! breaking the whole page.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::constants::UNKNOWN_TITLE;
use crate::models::{Episode, MovieDetail};

use super::{attr_any, normalize_url, trimmed_text};

/// Matches the player's all_sources array literal
static ALL_SOURCES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)var\s+all_sources\s*=\s*\[(.*?)\]").unwrap());

/// Matches a quoted absolute playlist URL
static QUOTED_M3U8_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["'](https?://[^"']+\.m3u8[^"']*)["']"#).unwrap());

/// Matches an unquoted absolute playlist URL
static BARE_M3U8_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"']+\.m3u8[^\s"']*"#).unwrap());

/// Matches the "- Tập N" suffix of per-episode page titles
static EPISODE_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*Tập\s*\d+.*$").unwrap());

/// Matches an episode label and captures its number
static EPISODE_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Tập\s*(\d+)").unwrap());

/// Parse a movie detail page
///
/// Every field is extracted best effort: a page without a recognizable
/// playlist still yields its title and episode list, with the missing
/// pieces empty.
pub fn parse_movie_detail(html: &str, base_url: &str) -> MovieDetail {
    let document = Html::parse_document(html);

    MovieDetail {
        title: extract_title(&document),
        thumbnail: extract_thumbnail(&document, base_url),
        m3u8_url: extract_m3u8_url(&document, base_url),
        episodes: extract_episodes(&document, base_url),
    }
}

fn extract_title(document: &Html) -> String {
    let h1_selector = Selector::parse("h1").unwrap();
    let og_title_selector = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    let heading_selector = Selector::parse(".entry-title, .movie-title").unwrap();

    if let Some(h1) = document.select(&h1_selector).next() {
        let title = EPISODE_SUFFIX_RE
            .replace(&trimmed_text(h1), "")
            .trim()
            .to_string();
        if !title.is_empty() {
            return title;
        }
    }

    if let Some(content) = document
        .select(&og_title_selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .filter(|content| !content.trim().is_empty())
    {
        return content.to_string();
    }

    if let Some(heading) = document.select(&heading_selector).next() {
        let title = trimmed_text(heading);
        if !title.is_empty() {
            return title;
        }
    }

    UNKNOWN_TITLE.to_string()
}

fn extract_thumbnail(document: &Html, base_url: &str) -> String {
    let og_image_selector = Selector::parse(r#"meta[property="og:image"]"#).unwrap();

    document
        .select(&og_image_selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| normalize_url(content, base_url))
        .unwrap_or_default()
}

/// Locate the HLS playlist URL for the page
///
/// Strategies, in priority order: the player's `all_sources` array, an
/// unquoted URL in any script, a quoted URL in any script, and finally
/// a `data-url`/`data-src`/`data-file` attribute on a player element.
/// Returns an empty string when every strategy misses.
fn extract_m3u8_url(document: &Html, base_url: &str) -> String {
    let script_selector = Selector::parse("script").unwrap();

    let scripts: Vec<String> = document
        .select(&script_selector)
        .map(|script| script.text().collect())
        .collect();

    for script in &scripts {
        if let Some(sources) = ALL_SOURCES_RE.captures(script) {
            if let Some(url) = QUOTED_M3U8_RE.captures(&sources[1]) {
                return url[1].to_string();
            }
        }
    }

    for script in &scripts {
        if let Some(found) = BARE_M3U8_RE.find(script) {
            return found.as_str().to_string();
        }
    }

    for script in &scripts {
        if let Some(url) = QUOTED_M3U8_RE.captures(script) {
            return url[1].to_string();
        }
    }

    let data_selector = Selector::parse("[data-url], [data-src], [data-file]").unwrap();
    if let Some(el) = document.select(&data_selector).next() {
        if let Some(value) = attr_any(el, &["data-url", "data-src", "data-file"]) {
            if value.contains(".m3u8") {
                return normalize_url(value, base_url);
            }
        }
    }

    String::new()
}

fn episode_number(text: &str) -> Option<u32> {
    EPISODE_LABEL_RE
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
}

/// Extract the episode list
///
/// The episode grid is the primary source; when a page carries no grid
/// at all, episode-shaped anchors anywhere in the document stand in,
/// with their labels synthesized from the parsed number. Episodes are
/// deduplicated by number and sorted ascending.
fn extract_episodes(document: &Html, base_url: &str) -> Vec<Episode> {
    let item_selector = Selector::parse(".episodes-grid .episode-item").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();
    let number_selector = Selector::parse(".episode-number").unwrap();

    let mut seen = HashSet::new();
    let mut episodes = Vec::new();

    for item in document.select(&item_selector) {
        let label = item
            .select(&number_selector)
            .next()
            .map(trimmed_text)
            .unwrap_or_default();

        let number = match episode_number(&label) {
            Some(number) if number > 0 => number,
            _ => continue,
        };

        let link = if item.value().name() == "a" {
            Some(item)
        } else {
            item.select(&anchor_selector).next()
        };

        let href = link
            .and_then(|l| l.value().attr("href"))
            .or_else(|| item.value().attr("href"))
            .unwrap_or_default();

        if seen.insert(number) {
            episodes.push(Episode {
                number,
                url: normalize_url(href, base_url),
                title: Some(label),
            });
        }
    }

    if episodes.is_empty() {
        let fallback_selector =
            Selector::parse(r#"a[href*="tap-"], a[href*="episode"], a[href*="ep-"]"#).unwrap();

        for anchor in document.select(&fallback_selector) {
            let text = trimmed_text(anchor);
            let number = match episode_number(&text) {
                Some(number) if number > 0 => number,
                _ => continue,
            };

            let href = anchor.value().attr("href").unwrap_or_default();

            if seen.insert(number) {
                episodes.push(Episode {
                    number,
                    url: normalize_url(href, base_url),
                    title: Some(format!("Tập {}", number)),
                });
            }
        }
    }

    episodes.sort_by_key(|episode| episode.number);
    episodes
}
