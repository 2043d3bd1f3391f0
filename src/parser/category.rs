//! Category listing parser
//!
//! Category pages carry one grid of movie cards plus WordPress-style
//! pagination markup. The two parts are independent: a page can have
//! cards without pagination (single page) and, on the last pages of a
//! stale listing, pagination without cards.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::constants::FALLBACK_SECTION_TITLE;
use crate::models::{CategoryPage, MovieSection, Pagination};

use super::{extract_cards, trimmed_text};

/// Matches the page number inside a pretty-permalink href
static HREF_PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/page/(\d+)").unwrap());

/// Matches the first run of digits in a link text
static PAGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());

/// Parse a category listing page
///
/// Returns `None` only when the page yields neither cards nor
/// pagination, which callers treat as an unknown category.
pub fn parse_category_page(html: &str, base_url: &str) -> Option<CategoryPage> {
    let document = Html::parse_document(html);

    let grid_selector = Selector::parse(".movies-section, .grid").unwrap();

    let container = document
        .select(&grid_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let movies = extract_cards(container, base_url, None);

    let mut data = Vec::new();
    if !movies.is_empty() {
        data.push(MovieSection {
            title: FALLBACK_SECTION_TITLE.to_string(),
            data: movies,
        });
    }

    let pagination = parse_pagination(&document);

    if data.is_empty() && pagination.is_none() {
        return None;
    }

    Some(CategoryPage { data, pagination })
}

fn first_number(text: &str) -> Option<u32> {
    PAGE_NUMBER_RE
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
}

fn page_from_href(el: ElementRef) -> Option<u32> {
    el.value()
        .attr("href")
        .and_then(|href| HREF_PAGE_RE.captures(href))
        .and_then(|captures| captures[1].parse().ok())
}

/// Parse WordPress pagination markup into page numbers
///
/// The element carrying the `current` class names the current page;
/// `prev`/`next` elements carry explicit neighbour hrefs; every other
/// numeric link raises the page total. Neighbours without an explicit
/// link are synthesized from the current page, and any neighbour that
/// would fall outside `1..=total_pages` is dropped. Returns `None`
/// when the page has no pagination container.
pub(crate) fn parse_pagination(document: &Html) -> Option<Pagination> {
    let container_selector =
        Selector::parse(".nav-links, ul.page-numbers, .nav-pagination").unwrap();
    let entry_selector = Selector::parse("a, span").unwrap();

    let container = document.select(&container_selector).next()?;

    let mut current_page = None;
    let mut explicit_prev = None;
    let mut explicit_next = None;
    let mut highest = 1u32;

    for entry in container.select(&entry_selector) {
        let classes: Vec<&str> = entry.value().classes().collect();

        if classes.contains(&"current") {
            if current_page.is_none() {
                current_page = first_number(&trimmed_text(entry));
            }
        } else if classes.contains(&"prev") {
            explicit_prev = page_from_href(entry);
        } else if classes.contains(&"next") {
            explicit_next = page_from_href(entry);
        } else if let Some(number) = first_number(&trimmed_text(entry)) {
            highest = highest.max(number);
        }
    }

    let current_page = current_page.unwrap_or(1).max(1);
    let total_pages = highest
        .max(current_page)
        .max(explicit_prev.unwrap_or(1))
        .max(explicit_next.unwrap_or(1));

    let prev_page = explicit_prev
        .or_else(|| (current_page > 1).then(|| current_page - 1))
        .filter(|&page| page >= 1 && page < current_page);
    let next_page = explicit_next
        .or_else(|| (current_page < total_pages).then(|| current_page + 1))
        .filter(|&page| page > current_page && page <= total_pages);

    Some(Pagination {
        current_page,
        total_pages,
        prev_page,
        next_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://bluphim.me";

    fn card(href: &str, title: &str) -> String {
        format!(
            r#"
            <div class="movie-card-2">
                <div class="movie-poster">
                    <a class="stretched-link" href="{href}" aria-label="{title}"></a>
                    <img src="/img/poster.jpg" />
                </div>
            </div>
            "#
        )
    }

    #[test]
    fn test_parse_category_page_basic() {
        let html = format!(
            r#"
            <html><body>
                <div class="movies-section">{}{}{}</div>
                <ul class="page-numbers">
                    <li><a class="page-numbers" href="/phim-bo/">1</a></li>
                    <li><span class="page-numbers current">2</span></li>
                    <li><a class="page-numbers" href="/phim-bo/page/3/">3</a></li>
                    <li><a class="next page-numbers" href="/phim-bo/page/3/">&raquo;</a></li>
                </ul>
            </body></html>
            "#,
            card("/phim-a/", "Phim A"),
            card("/phim-b/", "Phim B"),
            card("/phim-c/", "Phim C")
        );

        let page = parse_category_page(&html, BASE).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, FALLBACK_SECTION_TITLE);
        assert_eq!(page.data[0].data.len(), 3);

        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.prev_page, Some(1));
        assert_eq!(pagination.next_page, Some(3));
    }

    #[test]
    fn test_parse_category_page_without_pagination() {
        let html = format!(
            "<html><body><div class=\"grid\">{}</div></body></html>",
            card("/phim-a/", "Phim A")
        );

        let page = parse_category_page(&html, BASE).unwrap();
        assert_eq!(page.data[0].data.len(), 1);
        assert!(page.pagination.is_none());
    }

    #[test]
    fn test_parse_category_page_pagination_only() {
        let html = r#"
        <html><body>
            <div class="nav-links">
                <span class="page-numbers current">4</span>
            </div>
        </body></html>
        "#;

        let page = parse_category_page(html, BASE).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.unwrap().current_page, 4);
    }

    #[test]
    fn test_parse_category_page_empty_returns_none() {
        assert!(parse_category_page("<html><body><p>404</p></body></html>", BASE).is_none());
    }

    #[test]
    fn test_parse_category_page_root_fallback() {
        // No grid wrapper at all; cards are picked up from the
        // document root instead.
        let html = format!(
            "<html><body>{}{}</body></html>",
            card("/phim-a/", "Phim A"),
            card("/phim-b/", "Phim B")
        );

        let page = parse_category_page(&html, BASE).unwrap();
        assert_eq!(page.data[0].data.len(), 2);
    }

    #[test]
    fn test_parse_pagination_single_page() {
        let html = r#"
        <html><body>
            <ul class="page-numbers"><li><span class="page-numbers current">1</span></li></ul>
        </body></html>
        "#;
        let document = Html::parse_document(html);

        let pagination = parse_pagination(&document).unwrap();
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.prev_page, None);
        assert_eq!(pagination.next_page, None);
    }

    #[test]
    fn test_parse_pagination_explicit_prev_next() {
        let html = r#"
        <html><body>
            <div class="nav-links">
                <a class="prev page-numbers" href="/phim-le/page/4/">&laquo;</a>
                <span class="page-numbers current">5</span>
                <a class="page-numbers" href="/phim-le/page/10/">10</a>
                <a class="next page-numbers" href="/phim-le/page/6/">&raquo;</a>
            </div>
        </body></html>
        "#;
        let document = Html::parse_document(html);

        let pagination = parse_pagination(&document).unwrap();
        assert_eq!(pagination.current_page, 5);
        assert_eq!(pagination.total_pages, 10);
        assert_eq!(pagination.prev_page, Some(4));
        assert_eq!(pagination.next_page, Some(6));
    }

    #[test]
    fn test_parse_pagination_synthesizes_neighbors() {
        let html = r#"
        <html><body>
            <div class="nav-links">
                <a class="page-numbers" href="/phim-bo/">1</a>
                <a class="page-numbers" href="/phim-bo/page/2/">2</a>
                <span class="page-numbers current">3</span>
                <a class="page-numbers" href="/phim-bo/page/4/">4</a>
                <a class="page-numbers" href="/phim-bo/page/5/">5</a>
            </div>
        </body></html>
        "#;
        let document = Html::parse_document(html);

        let pagination = parse_pagination(&document).unwrap();
        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.total_pages, 5);
        assert_eq!(pagination.prev_page, Some(2));
        assert_eq!(pagination.next_page, Some(4));
    }

    #[test]
    fn test_parse_pagination_prev_without_page_href() {
        // Page 2's prev link points at the category root, with no
        // /page/ segment to read a number from.
        let html = r#"
        <html><body>
            <div class="nav-links">
                <a class="prev page-numbers" href="/phim-bo/">&laquo;</a>
                <span class="page-numbers current">2</span>
                <a class="page-numbers" href="/phim-bo/page/3/">3</a>
            </div>
        </body></html>
        "#;
        let document = Html::parse_document(html);

        let pagination = parse_pagination(&document).unwrap();
        assert_eq!(pagination.prev_page, Some(1));
        assert_eq!(pagination.next_page, Some(3));
    }

    #[test]
    fn test_parse_pagination_defaults_current_to_first_page() {
        let html = r#"
        <html><body>
            <div class="nav-links">
                <a class="page-numbers" href="/phim-bo/page/2/">2</a>
                <a class="page-numbers" href="/phim-bo/page/7/">7</a>
            </div>
        </body></html>
        "#;
        let document = Html::parse_document(html);

        let pagination = parse_pagination(&document).unwrap();
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 7);
        assert_eq!(pagination.prev_page, None);
        assert_eq!(pagination.next_page, Some(2));
    }

    #[test]
    fn test_parse_pagination_filters_inconsistent_next() {
        // A next link pointing backwards is dropped rather than
        // reported as a neighbour.
        let html = r#"
        <html><body>
            <div class="nav-links">
                <a class="page-numbers" href="/phim-bo/page/4/">4</a>
                <span class="page-numbers current">5</span>
                <a class="next page-numbers" href="/phim-bo/page/3/">&raquo;</a>
            </div>
        </body></html>
        "#;
        let document = Html::parse_document(html);

        let pagination = parse_pagination(&document).unwrap();
        assert_eq!(pagination.current_page, 5);
        assert_eq!(pagination.total_pages, 5);
        assert_eq!(pagination.prev_page, Some(4));
        assert_eq!(pagination.next_page, None);
    }

    #[test]
    fn test_parse_pagination_missing_container() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(parse_pagination(&document).is_none());
    }
}
