//! HTML link extraction
//!
//! Collects the targets of `<a href>` and `<img src>` from a page and
//! resolves them against the page's URL.

use scraper::{Html, Selector};
use url::Url;

/// Elements whose attribute names a crawlable resource
const LINK_SELECTOR: &str = "a[href], img[src]";

/// Extracts every link from an HTML document
///
/// # Extraction Rules
///
/// - `<a href="...">` and `<img src="...">` are collected; nothing else
/// - Values are trimmed, then resolved against `base_url` (RFC 3986
///   reference resolution; absolute references pass through unchanged)
/// - Values that fail to resolve are skipped; the rest of the page is
///   still extracted
/// - No scheme filtering happens here: `mailto:` and friends come back as
///   absolute URLs and are dropped later by the crawl scope
///
/// Links are returned in document order (depth-first, children before
/// later siblings), so identical input always gives identical output.
///
/// # Example
///
/// ```
/// use linkwalk::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/foo">x</a><img src="bar.png">"#;
/// let base = Url::parse("https://a.com/dir/page.html").unwrap();
/// let links: Vec<String> = extract_links(html, &base)
///     .into_iter()
///     .map(String::from)
///     .collect();
/// assert_eq!(links, ["https://a.com/foo", "https://a.com/dir/bar.png"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(LINK_SELECTOR) else {
        return Vec::new();
    };

    // select from the root element so traversal follows the tree, not
    // node creation order
    document
        .root_element()
        .select(&selector)
        .filter_map(|element| {
            let attr = match element.value().name() {
                "a" => "href",
                "img" => "src",
                _ => return None,
            };
            element.value().attr(attr)
        })
        .filter_map(|raw| resolve_link(raw, base_url))
        .collect()
}

/// Resolves one attribute value against the page URL
fn resolve_link(raw: &str, base_url: &Url) -> Option<Url> {
    match base_url.join(raw.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!("Skipping malformed link {:?} on {}: {}", raw, base_url, e);
            None
        }
    }
}
