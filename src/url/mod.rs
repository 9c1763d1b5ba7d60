//! URL handling: normalization and host scoping
//!
//! The crawler identifies pages by a normalized key (host + path) and only
//! follows links whose host matches the seed URL's host.

mod normalize;

pub use normalize::normalize_key;

use url::Url;

/// Returns true when both URLs share the same host
///
/// The comparison uses the parsed host only; scheme and port are ignored, so
/// `http://x.com/a` and `https://x.com/b` are same-host. URLs without a host
/// (e.g. `mailto:`) never match.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => ha.eq_ignore_ascii_case(hb),
        _ => false,
    }
}
