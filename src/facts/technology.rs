//! Technology fingerprints derived from the markup
//!
//! Header-based fingerprints (Server, X-Powered-By) are matched by the
//! technology checks, which see the response; this extractor covers
//! generator tags and well-known markup signatures.

use scraper::{Html, Selector};

/// A markup signature mapped to a technology name
const SIGNATURES: &[(&str, &str)] = &[
    ("wp-content/", "WordPress"),
    ("wp-includes/", "WordPress"),
    ("/_next/static", "Next.js"),
    ("__NUXT__", "Nuxt"),
    ("data-reactroot", "React"),
    ("ng-version=", "Angular"),
    ("data-v-app", "Vue"),
    ("cdn.shopify.com", "Shopify"),
    ("/sites/default/files", "Drupal"),
    ("/media/jui/", "Joomla"),
    ("data-turbo-track", "Hotwire Turbo"),
    ("ghost-url", "Ghost"),
    ("squarespace.com", "Squarespace"),
    ("wixstatic.com", "Wix"),
];

/// Technology facts for a page
#[derive(Debug, Clone, Default)]
pub struct TechnologyFacts {
    /// Content of `meta name="generator"`
    pub generator: Option<String>,

    /// Technologies detected from markup signatures, deduplicated
    pub detected: Vec<String>,
}

/// Extracts technology fingerprints from generator metadata and raw-body
/// signatures
pub fn extract(document: &Html, raw_body: &str) -> TechnologyFacts {
    let generator = Selector::parse(r#"meta[name="generator"]"#)
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|el| el.value().attr("content"))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        });

    let mut detected = Vec::new();
    for (needle, name) in SIGNATURES {
        if raw_body.contains(needle) && !detected.contains(&name.to_string()) {
            detected.push(name.to_string());
        }
    }

    TechnologyFacts {
        generator,
        detected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_from(html: &str) -> TechnologyFacts {
        extract(&Html::parse_document(html), html)
    }

    #[test]
    fn test_generator_meta() {
        let facts = extract_from(
            r#"<html><head><meta name="generator" content="WordPress 6.4"></head></html>"#,
        );
        assert_eq!(facts.generator.as_deref(), Some("WordPress 6.4"));
    }

    #[test]
    fn test_wordpress_signature() {
        let facts = extract_from(
            r#"<html><body><link href="/wp-content/themes/x/style.css"></body></html>"#,
        );
        assert_eq!(facts.detected, vec!["WordPress".to_string()]);
    }

    #[test]
    fn test_signatures_deduplicated() {
        let facts = extract_from(
            r#"<html><body>
            <script src="/wp-content/a.js"></script>
            <script src="/wp-includes/b.js"></script>
            </body></html>"#,
        );
        assert_eq!(facts.detected.len(), 1);
    }

    #[test]
    fn test_nothing_detected() {
        let facts = extract_from("<html><body><p>plain page</p></body></html>");
        assert!(facts.generator.is_none());
        assert!(facts.detected.is_empty());
    }

    #[test]
    fn test_multiple_technologies() {
        let facts = extract_from(
            r#"<html><body><script src="/_next/static/x.js"></script><div data-reactroot></div></body></html>"#,
        );
        assert!(facts.detected.contains(&"Next.js".to_string()));
        assert!(facts.detected.contains(&"React".to_string()));
    }
}
