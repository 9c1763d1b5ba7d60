//! URL normalization for visited-set identity
//!
//! Two URLs that normalize to the same key are the same page and are fetched
//! at most once per crawl. The key is deliberately not a fetchable URL; it is
//! a dedup identity.

use url::Url;

/// Derives the normalized identity key for a page URL
///
/// # Normalization rules
///
/// 1. Scheme is dropped, so `http://` and `https://` collapse
/// 2. Host is lower-cased (the `url` crate already stores it lower-cased)
/// 3. An explicit non-default port stays part of the key
/// 4. Trailing slash on the path is trimmed, so `/a/` and `/a` collapse
/// 5. Query and fragment are dropped
///
/// # Examples
///
/// ```
/// use sitescan::url::normalize_key;
/// use url::Url;
///
/// let url = Url::parse("HTTPS://BLOG.Example.com/path/").unwrap();
/// assert_eq!(normalize_key(&url), "blog.example.com/path");
/// ```
pub fn normalize_key(url: &Url) -> String {
    let mut key = String::new();

    if let Some(host) = url.host_str() {
        key.push_str(&host.to_lowercase());
    }

    // Url::port() is None for a scheme's default port, which keeps the key
    // insensitive to http/https defaults.
    if let Some(port) = url.port() {
        key.push(':');
        key.push_str(&port.to_string());
    }

    key.push_str(url.path());

    if key.ends_with('/') {
        key.pop();
    }

    key
}
