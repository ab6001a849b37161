//! Asset facts: the HTTP requests a browser would issue to render the
//! page (scripts, stylesheets, images, frames, media)

use crate::url::{resolve_url, Resolved};
use scraper::{Html, Selector};
use url::Url;

/// The kind of subresource an asset reference loads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Stylesheet,
    Image,
    Iframe,
    Media,
}

/// A single subresource reference, already resolved to an absolute URL
#[derive(Debug, Clone)]
pub struct AssetRef {
    pub url: String,
    pub kind: AssetKind,
}

/// All asset facts for a page
#[derive(Debug, Clone, Default)]
pub struct AssetFacts {
    /// Resolved subresource references in document order, deduplicated
    /// by URL
    pub requests: Vec<AssetRef>,

    /// Number of inline `<script>` blocks without a src
    pub inline_scripts: usize,

    /// Number of `<style>` blocks
    pub inline_styles: usize,
}

impl AssetFacts {
    /// Total HTTP requests to render the page, including the document
    /// itself
    pub fn request_count(&self) -> usize {
        self.requests.len() + 1
    }

    /// URLs of a given asset kind
    pub fn urls_of(&self, kind: AssetKind) -> Vec<&str> {
        self.requests
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.url.as_str())
            .collect()
    }
}

/// Extracts subresource references
pub fn extract(document: &Html, base_url: &Url) -> AssetFacts {
    let mut requests: Vec<AssetRef> = Vec::new();
    let mut push = |url: Url, kind: AssetKind| {
        let url = url.to_string();
        if !requests.iter().any(|a| a.url == url) {
            requests.push(AssetRef { url, kind });
        }
    };

    for (selector, attr, kind) in [
        ("script[src]", "src", AssetKind::Script),
        (r#"link[rel="stylesheet"][href]"#, "href", AssetKind::Stylesheet),
        ("img[src]", "src", AssetKind::Image),
        ("iframe[src]", "src", AssetKind::Iframe),
        ("video[src], audio[src], source[src]", "src", AssetKind::Media),
    ] {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        for el in document.select(&selector) {
            if let Some(raw) = el.value().attr(attr) {
                if let Resolved::Http(url) = resolve_url(raw, base_url) {
                    push(url, kind);
                }
            }
        }
    }

    AssetFacts {
        requests,
        inline_scripts: count_matches(document, "script:not([src])"),
        inline_styles: count_matches(document, "style"),
    }
}

fn count_matches(document: &Html, selector: &str) -> usize {
    Selector::parse(selector)
        .map(|s| document.select(&s).count())
        .unwrap_or(0)
}
