//! Structured page extraction
//!
//! Pure transformation of an HTML document into a [`PageRecord`]. Parse
//! problems never propagate: a malformed document degrades to empty fields
//! rather than an error.

use scraper::{Html, Selector};
use url::Url;

/// Structured data extracted from one crawled page
///
/// Created once per successfully fetched page and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// The URL the page was fetched from
    pub url: String,

    /// Text of the first `<h1>`, preferring one inside `<main>`
    pub h1: String,

    /// Text of the first `<p>`, preferring one inside `<main>`
    pub first_paragraph: String,

    /// Every `<a href>` in document order, resolved to absolute URLs
    pub outgoing_links: Vec<String>,

    /// Every `<img src>` in document order, resolved to absolute URLs
    pub image_urls: Vec<String>,
}

/// Extracts a [`PageRecord`] from an HTML document
///
/// Relative links and image references are resolved against `page_url`, the
/// URL this page was fetched from, not the crawl's seed.
pub fn extract_page_data(html: &str, page_url: &Url) -> PageRecord {
    let document = Html::parse_document(html);

    PageRecord {
        url: page_url.to_string(),
        h1: first_text(&document, "main h1", "h1"),
        first_paragraph: first_text(&document, "main p", "p"),
        outgoing_links: resolved_attrs(&document, "a[href]", "href", page_url),
        image_urls: resolved_attrs(&document, "img[src]", "src", page_url),
    }
}

/// Returns the trimmed text of the first element matching `scoped`, falling
/// back to `fallback` when the page has no main-content region (or the
/// region lacks such an element). Absence yields an empty string.
fn first_text(document: &Html, scoped: &str, fallback: &str) -> String {
    for css in [scoped, fallback] {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            return element.text().collect::<String>().trim().to_string();
        }
    }
    String::new()
}

/// Collects `attr` from every element matching `css`, in document order,
/// resolved against `base`. Unresolvable references are skipped.
fn resolved_attrs(document: &Html, css: &str, attr: &str, base: &Url) -> Vec<String> {
    let mut urls = Vec::new();

    let Ok(selector) = Selector::parse(css) else {
        return urls;
    };

    for element in document.select(&selector) {
        let Some(value) = element.value().attr(attr) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match base.join(value) {
            Ok(resolved) => urls.push(resolved.to_string()),
            Err(e) => tracing::debug!("skipping unresolvable {} '{}': {}", attr, value, e),
        }
    }

    urls
}
