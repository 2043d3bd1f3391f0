//! Parser module for extracting structured data from HTML
//!
//! This module provides the shared extraction primitives used by the
//! homepage, category and detail parsers: selector helpers, URL
//! normalization, rating parsing, and the movie-card extraction that
//! listing pages have in common. Every primitive tolerates missing
//! markup and returns an empty/absent value instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;

use crate::models::MovieSummary;

pub mod category;
pub mod detail;
pub mod homepage;

/// Matches the numeric token of a rating text (e.g. "8.5" or "85")
static RATING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)").unwrap());

/// Matches the numeric(+K) token of a "Lượt xem:" view-count badge
static VIEW_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Lượt xem:\s*([\d.]+K?)").unwrap());

/// Trimmed text content of an element
pub(crate) fn trimmed_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First attribute from `names` that is present and non-empty
pub(crate) fn attr_any<'a>(el: ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| el.value().attr(name).filter(|v| !v.trim().is_empty()))
}

fn nonempty_attr(el: ElementRef, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Whether the element matches any entry of `matchers`.
///
/// Entries starting with `.` are exact class-token matches; anything else
/// is compared against the tag name.
fn matches_any(el: &ElementRef, matchers: &[&str]) -> bool {
    matchers.iter().any(|matcher| {
        if let Some(class) = matcher.strip_prefix('.') {
            el.value().classes().any(|c| c == class)
        } else {
            el.value().name() == *matcher
        }
    })
}

/// Nearest ancestor (or the element itself) matching any of `matchers`
pub(crate) fn closest<'a>(el: ElementRef<'a>, matchers: &[&str]) -> Option<ElementRef<'a>> {
    if matches_any(&el, matchers) {
        return Some(el);
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| matches_any(ancestor, matchers))
}

/// Nearest following sibling matching any of `matchers`
pub(crate) fn following_sibling<'a>(
    el: ElementRef<'a>,
    matchers: &[&str],
) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| matches_any(sibling, matchers))
}

/// Normalize a possibly-relative URL against the upstream base
///
/// Protocol-relative URLs get an `https:` prefix, absolute paths get the
/// base origin prepended, everything else is joined to the base root.
/// Already-absolute URLs and empty strings pass through unchanged.
pub fn normalize_url(url: &str, base_url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    if url.starts_with("//") {
        return format!("https:{}", url);
    }
    if url.starts_with('/') {
        return format!("{}{}", base_url, url);
    }
    format!("{}/{}", base_url, url)
}

/// Parse a rating text into a 0-10 score
///
/// Uses the first numeric token, divided by 10 when it reads as an
/// out-of-100 score. Texts without digits fall back to counting star
/// glyphs; anything else is 0.
pub fn parse_rating(text: &str) -> f64 {
    if let Some(captures) = RATING_RE.captures(text) {
        if let Ok(rating) = captures[1].parse::<f64>() {
            return if rating > 10.0 { rating / 10.0 } else { rating };
        }
    }

    let stars = text.matches('\u{2605}').count();
    stars as f64
}

/// Reduce a view-count badge text to its numeric(+K) token, e.g.
/// "Lượt xem: 1.2K" becomes "1.2K". Texts not matching the label
/// pattern yield an empty string.
pub(crate) fn parse_view_count(text: &str) -> String {
    VIEW_COUNT_RE
        .captures(text)
        .map(|captures| captures[1].to_string())
        .unwrap_or_default()
}

/// Reduce an own-host absolute href to a relative slug
///
/// Both the http and https form of the configured base are recognized;
/// foreign hosts and already-relative hrefs are kept as-is.
pub(crate) fn relative_slug(href: &str, base_url: &str) -> String {
    let swapped = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("http://{}", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("https://{}", rest)
    } else {
        base_url.to_string()
    };

    for base in [base_url, swapped.as_str()] {
        if let Some(rest) = href.strip_prefix(base) {
            if rest.is_empty() || rest.starts_with('/') {
                return rest.trim_matches('/').to_string();
            }
        }
    }

    href.to_string()
}

/// Extract one movie card into a `MovieSummary`
///
/// Cards missing a resolvable link or title are dropped (returns `None`);
/// listing markup legitimately varies in completeness.
pub(crate) fn extract_card(card: ElementRef, base_url: &str) -> Option<MovieSummary> {
    let poster_selector = Selector::parse(".movie-poster").unwrap();
    let stretched_selector = Selector::parse("a.stretched-link").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();
    let img_selector = Selector::parse("img").unwrap();
    let title_link_selector = Selector::parse(".movie-title a").unwrap();
    let quality_selector = Selector::parse(".badge.quality-badge").unwrap();
    let episode_selector = Selector::parse(".badge.episode-badge").unwrap();
    let view_count_selector = Selector::parse(".badge.view-count").unwrap();
    let rating_selector = Selector::parse(".rating-badge, .rating, .star").unwrap();

    let poster = card.select(&poster_selector).next()?;
    let link = poster
        .select(&stretched_selector)
        .next()
        .or_else(|| poster.select(&anchor_selector).next())?;

    let href = link.value().attr("href").unwrap_or_default();
    if href.is_empty() {
        return None;
    }
    let url = relative_slug(href, base_url);
    if url.is_empty() {
        return None;
    }

    let img = poster.select(&img_selector).next();

    let title = nonempty_attr(link, "aria-label")
        .or_else(|| img.and_then(|i| nonempty_attr(i, "title")))
        .or_else(|| img.and_then(|i| nonempty_attr(i, "alt")))
        .or_else(|| {
            card.select(&title_link_selector)
                .next()
                .map(trimmed_text)
                .filter(|t| !t.is_empty())
        })
        .or_else(|| Some(trimmed_text(link)).filter(|t| !t.is_empty()))
        .unwrap_or_default();

    if title.is_empty() {
        return None;
    }

    let thumbnail = img
        .and_then(|i| attr_any(i, &["src", "data-src", "data-lazy-src"]))
        .map(|src| normalize_url(src, base_url))
        .unwrap_or_default();

    let quality = poster
        .select(&quality_selector)
        .next()
        .map(trimmed_text)
        .unwrap_or_default();

    let episode = poster
        .select(&episode_selector)
        .next()
        .map(trimmed_text)
        .unwrap_or_default();

    let view_count = poster
        .select(&view_count_selector)
        .next()
        .map(|el| parse_view_count(&trimmed_text(el)))
        .unwrap_or_default();

    let rating = poster
        .select(&rating_selector)
        .next()
        .map(|el| parse_rating(&trimmed_text(el)))
        .unwrap_or_default();

    Some(MovieSummary {
        title,
        url,
        thumbnail,
        quality,
        episode,
        rating,
        view_count,
    })
}

/// Extract all movie cards from a container element
///
/// Cards are deduplicated by resolved URL (first occurrence wins).
/// When `limit` is set, extraction stops once that many cards were
/// collected; category pages pass `None` for an unbounded list.
pub(crate) fn extract_cards(
    container: ElementRef,
    base_url: &str,
    limit: Option<usize>,
) -> Vec<MovieSummary> {
    let card_selector = Selector::parse(".movie-card-2").unwrap();

    let mut seen_urls = HashSet::new();
    let mut movies = Vec::new();

    for card in container.select(&card_selector) {
        if limit.is_some_and(|cap| movies.len() >= cap) {
            break;
        }
        if let Some(movie) = extract_card(card, base_url) {
            if seen_urls.insert(movie.url.clone()) {
                movies.push(movie);
            }
        }
    }

    movies
}
