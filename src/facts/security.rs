//! Content-security signals derived from the markup
//!
//! Header-derived signals (HSTS, CSP, frame options) are read by the
//! security checks directly from the response; this extractor covers what
//! only the document can tell us.

use crate::url::{resolve_url, Resolved};
use scraper::{Html, Selector};
use url::Url;

/// Markup-derived security facts
#[derive(Debug, Clone, Default)]
pub struct SecurityFacts {
    /// http:// subresources referenced from an https page
    pub mixed_content: Vec<String>,

    /// Form actions submitting to plain http
    pub insecure_form_actions: Vec<String>,

    /// Whether the page contains a password input
    pub has_password_input: bool,

    /// External scripts missing an integrity attribute
    pub scripts_without_integrity: usize,
}

/// Extracts markup security facts
pub fn extract(document: &Html, base_url: &Url) -> SecurityFacts {
    let page_is_https = base_url.scheme() == "https";

    SecurityFacts {
        mixed_content: if page_is_https {
            collect_http_subresources(document, base_url)
        } else {
            Vec::new()
        },
        insecure_form_actions: collect_insecure_forms(document, base_url),
        has_password_input: has_selector(document, r#"input[type="password"]"#),
        scripts_without_integrity: count_scripts_without_integrity(document, base_url),
    }
}

fn collect_http_subresources(document: &Html, base_url: &Url) -> Vec<String> {
    let mut found = Vec::new();

    for (selector, attr) in [
        ("script[src]", "src"),
        (r#"link[rel="stylesheet"][href]"#, "href"),
        ("img[src]", "src"),
        ("iframe[src]", "src"),
        ("video[src], audio[src], source[src]", "src"),
    ] {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        for el in document.select(&selector) {
            if let Some(raw) = el.value().attr(attr) {
                if let Resolved::Http(url) = resolve_url(raw, base_url) {
                    if url.scheme() == "http" && !found.contains(&url.to_string()) {
                        found.push(url.to_string());
                    }
                }
            }
        }
    }

    found
}

fn collect_insecure_forms(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("form[action]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("action"))
        .filter_map(|action| match resolve_url(action, base_url) {
            Resolved::Http(url) if url.scheme() == "http" => Some(url.to_string()),
            _ => None,
        })
        .collect()
}

fn count_scripts_without_integrity(document: &Html, base_url: &Url) -> usize {
    let Ok(selector) = Selector::parse("script[src]") else {
        return 0;
    };

    document
        .select(&selector)
        .filter(|el| el.value().attr("integrity").is_none())
        .filter(|el| {
            // Only third-party scripts are expected to carry SRI hashes
            el.value()
                .attr("src")
                .map(|src| match resolve_url(src, base_url) {
                    Resolved::Http(url) => !crate::url::is_internal(&url, base_url),
                    _ => false,
                })
                .unwrap_or(false)
        })
        .count()
}

fn has_selector(document: &Html, selector: &str) -> bool {
    Selector::parse(selector)
        .map(|s| document.select(&s).next().is_some())
        .unwrap_or(false)
}
