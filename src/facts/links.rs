//! Link facts: every anchor on the page, resolved and classified

use crate::url::{is_internal, resolve_url, Resolved};
use scraper::{Html, Selector};
use url::Url;

/// Where a link points after resolution
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// Resolved HTTP(S) URL, classified against the page host
    Http { url: String, internal: bool },

    /// mailto:, tel:, or data: href, passed through unresolved
    Passthrough(String),

    /// Unresolvable or intentionally skipped href
    Invalid,
}

/// A single anchor element
#[derive(Debug, Clone)]
pub struct Link {
    /// The href attribute as written
    pub raw: String,

    /// Resolution outcome
    pub target: LinkTarget,

    /// Trimmed anchor text
    pub anchor: String,

    /// Whether rel contains nofollow
    pub nofollow: bool,
}

/// All anchor facts for a page
#[derive(Debug, Clone, Default)]
pub struct LinkFacts {
    pub links: Vec<Link>,
}

impl LinkFacts {
    /// Number of links resolving to the page's own host (or a subdomain)
    pub fn internal_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| matches!(l.target, LinkTarget::Http { internal: true, .. }))
            .count()
    }

    /// Number of links resolving to a foreign host
    pub fn external_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| matches!(l.target, LinkTarget::Http { internal: false, .. }))
            .count()
    }

    /// Total number of resolved HTTP(S) links
    pub fn http_count(&self) -> usize {
        self.internal_count() + self.external_count()
    }

    /// Links with empty anchor text (and no title fallback recorded)
    pub fn empty_anchor_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| matches!(l.target, LinkTarget::Http { .. }) && l.anchor.is_empty())
            .count()
    }
}

/// Extracts link facts from every `a[href]` element
pub fn extract(document: &Html, base_url: &Url) -> LinkFacts {
    let Ok(selector) = Selector::parse("a[href]") else {
        return LinkFacts::default();
    };

    let links = document
        .select(&selector)
        .filter_map(|el| {
            let raw = el.value().attr("href")?.to_string();

            let target = match resolve_url(&raw, base_url) {
                Resolved::Http(url) => LinkTarget::Http {
                    internal: is_internal(&url, base_url),
                    url: url.to_string(),
                },
                Resolved::Passthrough(s) => LinkTarget::Passthrough(s),
                Resolved::Skipped => LinkTarget::Invalid,
            };

            let nofollow = el
                .value()
                .attr("rel")
                .map(|rel| rel.split_whitespace().any(|part| part.eq_ignore_ascii_case("nofollow")))
                .unwrap_or(false);

            Some(Link {
                raw,
                target,
                anchor: el.text().collect::<String>().trim().to_string(),
                nofollow,
            })
        })
        .collect();

    LinkFacts { links }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_from(html: &str) -> LinkFacts {
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com/page").unwrap();
        extract(&document, &base)
    }

    #[test]
    fn test_internal_and_external_counts() {
        let facts = extract_from(
            r#"<html><body>
            <a href="/about">About</a>
            <a href="https://blog.example.com/post">Blog</a>
            <a href="https://other.com/">Other</a>
            </body></html>"#,
        );
        assert_eq!(facts.internal_count(), 2);
        assert_eq!(facts.external_count(), 1);
        assert_eq!(facts.http_count(), 3);
    }

    #[test]
    fn test_mailto_not_counted_as_http() {
        let facts = extract_from(r#"<html><body><a href="mailto:a@b.c">Mail</a></body></html>"#);
        assert_eq!(facts.http_count(), 0);
        assert!(matches!(facts.links[0].target, LinkTarget::Passthrough(_)));
    }

    #[test]
    fn test_nofollow_detected() {
        let facts = extract_from(
            r#"<html><body><a href="/x" rel="external nofollow">x</a><a href="/y">y</a></body></html>"#,
        );
        assert!(facts.links[0].nofollow);
        assert!(!facts.links[1].nofollow);
    }

    #[test]
    fn test_empty_anchor_counted() {
        let facts = extract_from(
            r#"<html><body><a href="/x"></a><a href="/y">labeled</a></body></html>"#,
        );
        assert_eq!(facts.empty_anchor_count(), 1);
    }

    #[test]
    fn test_fragment_only_link_invalid() {
        let facts = extract_from(r##"<html><body><a href="#top">Top</a></body></html>"##);
        assert_eq!(facts.links[0].target, LinkTarget::Invalid);
        assert_eq!(facts.http_count(), 0);
    }
}
