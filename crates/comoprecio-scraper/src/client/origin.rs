//! URL helpers shared by the store parsers.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a search term for use as a query value.
///
/// Spaces become `%20` and `+` becomes `%2B`.
#[must_use]
pub fn encode_component(term: &str) -> String {
    utf8_percent_encode(term, COMPONENT).to_string()
}

/// Turns a listing href into an absolute URL.
///
/// Hrefs that already start with `http` are returned as-is; anything else
/// (including a missing href) is appended to `base_url`.
#[must_use]
pub fn absolutize(base_url: &str, href: Option<&str>) -> String {
    match href {
        Some(h) if h.starts_with("http") => h.to_owned(),
        Some(h) => format!("{}{h}", base_url.trim_end_matches('/')),
        None => base_url.trim_end_matches('/').to_owned(),
    }
}

/// Extracts the hostname from a URL for log fields.
///
/// Falls back to the full string if parsing fails.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
