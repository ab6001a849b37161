//! In-page URL resolution
//!
//! Every HTML-derived extractor resolves URLs with the same rules:
//! - relative URLs resolve against the final (post-redirect) page URL
//! - protocol-relative URLs inherit the page's scheme
//! - fragment identifiers are stripped before resolution
//! - `mailto:`, `tel:`, and `data:` URLs pass through unresolved

use url::Url;

/// Outcome of resolving a raw href/src attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// An absolute HTTP(S) URL
    Http(Url),

    /// A scheme that passes through unresolved (mailto:, tel:, data:)
    Passthrough(String),

    /// Empty, fragment-only, or unparseable
    Skipped,
}

impl Resolved {
    /// Returns the resolved URL if this is an HTTP(S) resolution
    pub fn as_http(&self) -> Option<&Url> {
        match self {
            Resolved::Http(url) => Some(url),
            _ => None,
        }
    }
}

/// Resolves a raw attribute value against the final page URL
pub fn resolve_url(raw: &str, base: &Url) -> Resolved {
    let raw = raw.trim();

    if raw.is_empty() {
        return Resolved::Skipped;
    }

    if raw.starts_with("mailto:") || raw.starts_with("tel:") || raw.starts_with("data:") {
        return Resolved::Passthrough(raw.to_string());
    }

    if raw.starts_with("javascript:") {
        return Resolved::Skipped;
    }

    // Strip the fragment before resolution
    let without_fragment = match raw.split_once('#') {
        Some((before, _)) => before,
        None => raw,
    };

    if without_fragment.is_empty() {
        return Resolved::Skipped;
    }

    match base.join(without_fragment) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Resolved::Http(url),
        _ => Resolved::Skipped,
    }
}
