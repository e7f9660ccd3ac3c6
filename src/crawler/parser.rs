//! HTML parser for extracting links
//!
//! This module handles parsing HTML content to extract the links the
//! crawler follows. Parsing is permissive; malformed markup yields whatever
//! anchors html5ever recovers.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Extracts every followable link from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, relative or absolute
///
/// **Exclude:**
/// - `javascript:`, `mailto:` and other non-HTTP schemes
/// - Fragment-only (`#...`) and empty hrefs
///
/// Links come back normalized and deduplicated, in the order they first
/// appear in the page.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The normalized URL of the page, for resolving relative links
///
/// # Example
///
/// ```
/// use sumi_index::crawler::extract_links;
///
/// let html = r#"<a href="/b">B</a><a href="a">A</a><a href="/b#top">B again</a>"#;
/// let links = extract_links(html, "https://example.com/dir/page");
/// assert_eq!(links, vec!["https://example.com/b", "https://example.com/dir/a"]);
/// ```
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute_url) = resolve_link(base_url, href.trim()) {
            if seen.insert(absolute_url.clone()) {
                links.push(absolute_url);
            }
        }
    }

    links
}
