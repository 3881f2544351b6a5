//! HTML parsing and link extraction
//!
//! All element queries happen in one synchronous pass that produces
//! owned strings. `scraper::Html` is not `Send`, so the parsed
//! document must never be held across an await point; workers parse,
//! take what they need, and drop the tree before any network or disk
//! I/O.

use crate::state::LinkRegistry;
use crate::url::resolve_reference;
use scraper::{Html, Selector};
use url::Url;

/// Owned extraction of everything a page worker needs from a document
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The document re-serialized in normalized form
    pub html: String,

    /// hrefs of `<link>` elements whose rel marks a stylesheet or icon
    pub stylesheets: Vec<String>,

    /// srcs of `<img>` elements
    pub images: Vec<String>,

    /// srcs of `<script>` elements
    pub scripts: Vec<String>,

    /// hrefs of `<a>` elements, unresolved
    pub anchors: Vec<String>,
}

/// Parses a page body and extracts asset references and anchors.
///
/// Elements missing the relevant attribute are skipped silently, as
/// are `<link>` elements whose rel is absent or names something other
/// than a stylesheet or shortcut icon. Only the first token of a
/// multi-valued rel (e.g. "shortcut icon") is considered.
pub fn parse_page(body: &str) -> ParsedPage {
    let document = Html::parse_document(body);
    let mut page = ParsedPage {
        html: document.root_element().html(),
        ..ParsedPage::default()
    };

    if let Ok(selector) = Selector::parse("link[href]") {
        for element in document.select(&selector) {
            let rel_kind = element
                .value()
                .attr("rel")
                .and_then(|rel| rel.split_whitespace().next());
            if !matches!(rel_kind, Some("stylesheet") | Some("shortcut")) {
                continue;
            }
            if let Some(href) = element.value().attr("href") {
                page.stylesheets.push(href.to_string());
            }
        }
    }

    if let Ok(selector) = Selector::parse("img[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                page.images.push(src.to_string());
            }
        }
    }

    if let Ok(selector) = Selector::parse("script[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                page.scripts.push(src.to_string());
            }
        }
    }

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                page.anchors.push(href.to_string());
            }
        }
    }

    page
}

/// Resolves anchor references and reports only URLs not already known
/// to the registry.
///
/// Malformed and non-http(s) references are dropped silently. The
/// returned set is a pre-filter; the registry's `try_register` remains
/// the atomic gate against concurrent discovery of the same URL.
pub fn extract_new_links(anchors: &[String], base: &Url, registry: &LinkRegistry) -> Vec<Url> {
    let mut links = Vec::new();

    for anchor in anchors {
        if let Some(resolved) = resolve_reference(base, anchor) {
            if !registry.contains(resolved.as_str()) {
                links.push(resolved);
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("http://site.test/shop/index.html").unwrap()
    }

    #[test]
    fn extracts_stylesheet_links() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="/static/main.css" />
            <link rel="shortcut icon" href="/static/favicon.ico" />
        </head><body></body></html>"#;
        let page = parse_page(html);
        assert_eq!(page.stylesheets, vec!["/static/main.css", "/static/favicon.ico"]);
    }

    #[test]
    fn skips_links_without_interesting_rel() {
        let html = r#"<html><head>
            <link rel="canonical" href="/canonical.html" />
            <link rel="preload" href="/font.woff2" />
            <link href="/no-rel.css" />
        </head><body></body></html>"#;
        let page = parse_page(html);
        assert!(page.stylesheets.is_empty());
    }

    #[test]
    fn extracts_images() {
        let html = r#"<html><body>
            <img src="cover.png" />
            <img src="/media/banner.jpg" alt="banner" />
            <img alt="no source" />
        </body></html>"#;
        let page = parse_page(html);
        assert_eq!(page.images, vec!["cover.png", "/media/banner.jpg"]);
    }

    #[test]
    fn extracts_scripts_and_anchors() {
        let html = r#"<html><body>
            <script src="/js/app.js"></script>
            <script>inline()</script>
            <a href="page-2.html">next</a>
        </body></html>"#;
        let page = parse_page(html);
        assert_eq!(page.scripts, vec!["/js/app.js"]);
        assert_eq!(page.anchors, vec!["page-2.html"]);
    }

    #[test]
    fn serialized_html_is_normalized() {
        let page = parse_page("<p>unclosed");
        assert!(page.html.contains("<html>"));
        assert!(page.html.contains("<p>unclosed</p>"));
    }

    #[test]
    fn new_links_are_resolved_and_filtered() {
        let registry = LinkRegistry::new();
        registry.try_register("http://site.test/shop/known.html");

        let anchors = vec![
            "known.html".to_string(),
            "fresh.html".to_string(),
            "#fragment".to_string(),
            "mailto:a@b.test".to_string(),
        ];

        let links = extract_new_links(&anchors, &base_url(), &registry);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "http://site.test/shop/fresh.html");
    }

    #[test]
    fn duplicate_anchors_resolve_to_duplicate_entries() {
        // Deduplication is the registry's job, not the extractor's;
        // try_register ignores the second occurrence.
        let registry = LinkRegistry::new();
        let anchors = vec!["a.html".to_string(), "./a.html".to_string()];
        let links = extract_new_links(&anchors, &base_url(), &registry);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], links[1]);
    }
}
