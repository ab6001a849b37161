//! Media facts: images and their attributes

use crate::url::{resolve_url, Resolved};
use scraper::{Html, Selector};
use url::Url;

/// A single `<img>` element
#[derive(Debug, Clone)]
pub struct Image {
    /// The src attribute as written
    pub src: String,

    /// Resolved absolute URL; `None` for data: URIs and unresolvable srcs
    pub resolved: Option<String>,

    /// The alt attribute; `None` when the attribute is missing entirely
    pub alt: Option<String>,

    /// File extension of the resolved path, lowercased
    pub format: Option<String>,

    /// Whether width and height attributes are both present
    pub has_dimensions: bool,

    /// Whether loading="lazy" is set
    pub lazy: bool,

    /// Whether the src is a data: URI
    pub inline_data: bool,
}

/// All media facts for a page
#[derive(Debug, Clone, Default)]
pub struct MediaFacts {
    pub images: Vec<Image>,
}

impl MediaFacts {
    /// Images whose alt attribute is missing (empty alt counts as present;
    /// it is the documented way to mark decorative images)
    pub fn missing_alt_count(&self) -> usize {
        self.images.iter().filter(|i| i.alt.is_none()).count()
    }

    /// Probe-able image URLs (data: URIs excluded)
    pub fn probe_urls(&self) -> Vec<&str> {
        self.images
            .iter()
            .filter_map(|i| i.resolved.as_deref())
            .collect()
    }
}

/// Extracts image facts from every `img[src]` element
pub fn extract(document: &Html, base_url: &Url) -> MediaFacts {
    let Ok(selector) = Selector::parse("img[src]") else {
        return MediaFacts::default();
    };

    let images = document
        .select(&selector)
        .filter_map(|el| {
            let src = el.value().attr("src")?.to_string();

            let (resolved, inline_data) = match resolve_url(&src, base_url) {
                Resolved::Http(url) => (Some(url.to_string()), false),
                Resolved::Passthrough(raw) => (None, raw.starts_with("data:")),
                Resolved::Skipped => (None, false),
            };

            let format = resolved.as_deref().and_then(extension_of);

            Some(Image {
                src,
                resolved,
                alt: el.value().attr("alt").map(|s| s.trim().to_string()),
                format,
                has_dimensions: el.value().attr("width").is_some()
                    && el.value().attr("height").is_some(),
                lazy: el
                    .value()
                    .attr("loading")
                    .map(|v| v.eq_ignore_ascii_case("lazy"))
                    .unwrap_or(false),
                inline_data,
            })
        })
        .collect();

    MediaFacts { images }
}

/// Returns the lowercased extension of a URL path, ignoring the query
fn extension_of(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let (_, ext) = path.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_from(html: &str) -> MediaFacts {
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com/page").unwrap();
        extract(&document, &base)
    }

    #[test]
    fn test_image_resolved() {
        let facts = extract_from(r#"<html><body><img src="/logo.png" alt="Logo"></body></html>"#);
        assert_eq!(facts.images.len(), 1);
        assert_eq!(
            facts.images[0].resolved.as_deref(),
            Some("https://example.com/logo.png")
        );
        assert_eq!(facts.images[0].format.as_deref(), Some("png"));
    }

    #[test]
    fn test_missing_alt_counted() {
        let facts = extract_from(
            r#"<html><body><img src="/a.png"><img src="/b.png" alt=""><img src="/c.png" alt="c"></body></html>"#,
        );
        assert_eq!(facts.missing_alt_count(), 1);
    }

    #[test]
    fn test_data_uri_not_probeable() {
        let facts = extract_from(
            r#"<html><body><img src="data:image/gif;base64,R0lGOD"></body></html>"#,
        );
        assert!(facts.images[0].inline_data);
        assert!(facts.images[0].resolved.is_none());
        assert!(facts.probe_urls().is_empty());
    }

    #[test]
    fn test_dimensions_and_lazy() {
        let facts = extract_from(
            r#"<html><body><img src="/a.webp" width="10" height="10" loading="lazy"></body></html>"#,
        );
        assert!(facts.images[0].has_dimensions);
        assert!(facts.images[0].lazy);
        assert_eq!(facts.images[0].format.as_deref(), Some("webp"));
    }

    #[test]
    fn test_extension_ignores_query() {
        assert_eq!(
            extension_of("https://example.com/img.jpg?v=2"),
            Some("jpg".to_string())
        );
        assert_eq!(extension_of("https://example.com/noext"), None);
    }
}
