//! Homepage parser
//!
//! The upstream homepage is a sequence of titled sections ("Phim mới",
//! "Phim bộ", ...), each followed by a grid of movie cards. Section
//! markup varies between the site's layouts, so the grid belonging to a
//! header is located through a chain of fallbacks.

use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::constants::FALLBACK_SECTION_TITLE;
use crate::models::{HomepageData, MovieSection};

use super::{closest, extract_cards, following_sibling, trimmed_text};

/// Cards kept per homepage section
const SECTION_CARD_LIMIT: usize = 20;

/// Parse the upstream homepage into titled movie sections
///
/// Section titles are deduplicated (first occurrence wins) and sections
/// without any extractable card are dropped. When no titled section
/// yields cards, the page is retried as a single untitled grid, the
/// same shape a category page has. Returns `None` when nothing could be
/// extracted at all; callers treat that as "content not found" rather
/// than an empty page.
pub fn parse_homepage(html: &str, base_url: &str) -> Option<HomepageData> {
    let document = Html::parse_document(html);

    let header_selector = Selector::parse(".section-title-main").unwrap();
    let grid_selector = Selector::parse(".movies-section, .grid").unwrap();

    let mut seen_titles = HashSet::new();
    let mut sections = Vec::new();

    for header in document.select(&header_selector) {
        let title = trimmed_text(header);
        if title.is_empty() || !seen_titles.insert(title.clone()) {
            continue;
        }

        let container = closest(header, &[".col-inner", ".container", "section"]);

        let movies_container = container
            .and_then(|c| c.select(&grid_selector).next())
            .or_else(|| {
                closest(header, &[".section-title-container", ".container"])
                    .and_then(|tc| following_sibling(tc, &[".movies-section", ".grid", ".text"]))
            })
            .or(container);

        let movies_container = match movies_container {
            Some(el) => el,
            None => continue,
        };

        let movies = extract_cards(movies_container, base_url, Some(SECTION_CARD_LIMIT));
        if !movies.is_empty() {
            sections.push(MovieSection {
                title,
                data: movies,
            });
        }
    }

    if sections.is_empty() {
        if let Some(grid) = document.select(&grid_selector).next() {
            let movies = extract_cards(grid, base_url, None);
            if !movies.is_empty() {
                sections.push(MovieSection {
                    title: FALLBACK_SECTION_TITLE.to_string(),
                    data: movies,
                });
            }
        }
    }

    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
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

    fn titled_section(title: &str, cards: &str) -> String {
        format!(
            r#"
            <section>
                <div class="container">
                    <h2 class="section-title-main">{title}</h2>
                    <div class="movies-section">{cards}</div>
                </div>
            </section>
            "#
        )
    }

    #[test]
    fn test_parse_homepage_extracts_titled_sections() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            titled_section(
                "Phim mới",
                &format!("{}{}", card("/phim-a/", "Phim A"), card("/phim-b/", "Phim B"))
            ),
            titled_section("Phim bộ", &card("/phim-c/", "Phim C"))
        );

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Phim mới");
        assert_eq!(sections[0].data.len(), 2);
        assert_eq!(sections[0].data[0].url, "/phim-a/");
        assert_eq!(sections[1].title, "Phim bộ");
        assert_eq!(sections[1].data.len(), 1);
    }

    #[test]
    fn test_parse_homepage_drops_sections_without_cards() {
        // The second section's cards have no poster wrapper and are
        // all rejected, so the section disappears entirely.
        let broken = r#"<div class="movie-card-2"><img src="x.jpg" /></div>"#;
        let html = format!(
            "<html><body>{}{}</body></html>",
            titled_section(
                "Phim mới",
                &format!(
                    "{}{}{}",
                    card("/phim-a/", "Phim A"),
                    card("/phim-b/", "Phim B"),
                    card("/phim-c/", "Phim C")
                )
            ),
            titled_section("Phim bộ", broken)
        );

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Phim mới");
        assert_eq!(sections[0].data.len(), 3);
    }

    #[test]
    fn test_parse_homepage_dedupes_repeated_titles() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            titled_section("Phim mới", &card("/phim-a/", "Phim A")),
            titled_section("Phim mới", &card("/phim-b/", "Phim B"))
        );

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].data.len(), 1);
        assert_eq!(sections[0].data[0].url, "/phim-a/");
    }

    #[test]
    fn test_parse_homepage_first_occurrence_blocks_duplicates() {
        // A title is claimed when first seen, even if that occurrence
        // produced no cards.
        let broken = r#"<div class="movie-card-2"></div>"#;
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            titled_section("Phim bộ", broken),
            titled_section("Phim bộ", &card("/phim-a/", "Phim A")),
            titled_section("Phim lẻ", &card("/phim-b/", "Phim B"))
        );

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Phim lẻ");
    }

    #[test]
    fn test_parse_homepage_sibling_grid_fallback() {
        // No container ancestor wraps header and grid together; the
        // grid is found as a sibling of the title container instead.
        let html = format!(
            r#"
            <html><body>
                <div class="section-title-container">
                    <h2 class="section-title-main">Phim lẻ</h2>
                </div>
                <div class="spacer"></div>
                <div class="movies-section">{}</div>
            </body></html>
            "#,
            card("/phim-a/", "Phim A")
        );

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Phim lẻ");
        assert_eq!(sections[0].data.len(), 1);
    }

    #[test]
    fn test_parse_homepage_falls_back_to_container_cards() {
        // Cards sit directly in the section without a grid wrapper.
        let html = format!(
            r#"
            <html><body>
                <section>
                    <h2 class="section-title-main">Phim mới</h2>
                    {}
                </section>
            </body></html>
            "#,
            card("/phim-a/", "Phim A")
        );

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].data.len(), 1);
    }

    #[test]
    fn test_parse_homepage_category_shaped_fallback() {
        let html = format!(
            "<html><body><div class=\"grid\">{}{}</div></body></html>",
            card("/phim-a/", "Phim A"),
            card("/phim-b/", "Phim B")
        );

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, FALLBACK_SECTION_TITLE);
        assert_eq!(sections[0].data.len(), 2);
    }

    #[test]
    fn test_parse_homepage_without_content_returns_none() {
        assert!(parse_homepage("<html><body><p>maintenance</p></body></html>", BASE).is_none());
    }

    #[test]
    fn test_parse_homepage_caps_section_size() {
        let cards: String = (0..25)
            .map(|i| card(&format!("/phim-{}/", i), &format!("Phim {}", i)))
            .collect();
        let html = format!("<html><body>{}</body></html>", titled_section("Phim mới", &cards));

        let sections = parse_homepage(&html, BASE).unwrap();
        assert_eq!(sections[0].data.len(), SECTION_CARD_LIMIT);
    }
}
