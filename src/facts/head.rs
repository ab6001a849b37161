//! Head metadata facts: title, meta tags, canonical link, favicon,
//! social markup, and alternate-language links

use crate::url::{resolve_url, Resolved};
use scraper::{Html, Selector};
use url::Url;

/// Facts extracted from the document head
#[derive(Debug, Clone, Default)]
pub struct HeadFacts {
    /// Text of the first `<title>` element; `None` when the tag is absent,
    /// `Some("")` when present but empty (the distinction matters to the
    /// title check)
    pub title: Option<String>,

    pub meta_description: Option<String>,

    pub meta_keywords: Option<String>,

    /// Raw canonical href as written in the markup
    pub canonical: Option<String>,

    /// Canonical href resolved against the page URL
    pub canonical_resolved: Option<Url>,

    pub viewport: Option<String>,

    /// Resolved favicon URL from `link rel="icon"` (or shortcut icon)
    pub favicon: Option<String>,

    /// Content of `meta name="robots"`
    pub robots_meta: Option<String>,

    /// Declared character set from `meta charset` or http-equiv
    pub charset: Option<String>,

    /// Open Graph properties, in document order
    pub og_properties: Vec<(String, String)>,

    /// hreflang values from alternate links
    pub hreflang: Vec<String>,
}

/// Extracts head metadata facts
pub fn extract(document: &Html, base_url: &Url) -> HeadFacts {
    let canonical = attr_of(document, r#"link[rel="canonical"]"#, "href");
    let canonical_resolved = canonical
        .as_deref()
        .and_then(|href| resolve_url(href, base_url).as_http().cloned());

    HeadFacts {
        title: extract_title(document),
        meta_description: meta_content(document, "description"),
        meta_keywords: meta_content(document, "keywords"),
        canonical,
        canonical_resolved,
        viewport: meta_content(document, "viewport"),
        favicon: extract_favicon(document, base_url),
        robots_meta: meta_content(document, "robots"),
        charset: extract_charset(document),
        og_properties: extract_og_properties(document),
        hreflang: extract_hreflang(document),
    }
}

/// Extracts the title, distinguishing an absent tag from an empty one
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{}"]"#, name)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
}

fn attr_of(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_favicon(document: &Html, base_url: &Url) -> Option<String> {
    let selector = Selector::parse(r#"link[rel~="icon"]"#).ok()?;
    let href = document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))?;

    match resolve_url(href, base_url) {
        Resolved::Http(url) => Some(url.to_string()),
        Resolved::Passthrough(raw) => Some(raw),
        Resolved::Skipped => None,
    }
}

fn extract_charset(document: &Html) -> Option<String> {
    if let Some(charset) = attr_of(document, "meta[charset]", "charset") {
        return Some(charset.to_lowercase());
    }

    // Legacy http-equiv form: content="text/html; charset=utf-8"
    let content = attr_of(document, r#"meta[http-equiv="Content-Type"]"#, "content")?;
    content
        .split(';')
        .find_map(|part| part.trim().strip_prefix("charset="))
        .map(|cs| cs.trim().to_lowercase())
}

fn extract_og_properties(document: &Html) -> Vec<(String, String)> {
    let Ok(selector) = Selector::parse(r#"meta[property^="og:"]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let property = el.value().attr("property")?;
            let content = el.value().attr("content")?;
            Some((property.to_string(), content.to_string()))
        })
        .collect()
}

fn extract_hreflang(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"link[rel="alternate"][hreflang]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("hreflang").map(|s| s.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_from(html: &str) -> HeadFacts {
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com/page").unwrap();
        extract(&document, &base)
    }

    #[test]
    fn test_title_extracted() {
        let facts = extract_from("<html><head><title> Test Page Title </title></head></html>");
        assert_eq!(facts.title.as_deref(), Some("Test Page Title"));
    }

    #[test]
    fn test_absent_title_is_none() {
        let facts = extract_from("<html><head></head></html>");
        assert!(facts.title.is_none());
    }

    #[test]
    fn test_empty_title_is_some_empty() {
        let facts = extract_from("<html><head><title></title></head></html>");
        assert_eq!(facts.title.as_deref(), Some(""));
    }

    #[test]
    fn test_meta_description() {
        let facts = extract_from(
            r#"<html><head><meta name="description" content="A page."></head></html>"#,
        );
        assert_eq!(facts.meta_description.as_deref(), Some("A page."));
    }

    #[test]
    fn test_canonical_resolved_against_page() {
        let facts =
            extract_from(r#"<html><head><link rel="canonical" href="/canonical"></head></html>"#);
        assert_eq!(facts.canonical.as_deref(), Some("/canonical"));
        assert_eq!(
            facts.canonical_resolved.as_ref().unwrap().as_str(),
            "https://example.com/canonical"
        );
    }

    #[test]
    fn test_favicon_resolved() {
        let facts =
            extract_from(r#"<html><head><link rel="icon" href="/favicon.ico"></head></html>"#);
        assert_eq!(
            facts.favicon.as_deref(),
            Some("https://example.com/favicon.ico")
        );
    }

    #[test]
    fn test_shortcut_icon_matched() {
        let facts = extract_from(
            r#"<html><head><link rel="shortcut icon" href="/fav.png"></head></html>"#,
        );
        assert_eq!(facts.favicon.as_deref(), Some("https://example.com/fav.png"));
    }

    #[test]
    fn test_charset_meta() {
        let facts = extract_from(r#"<html><head><meta charset="UTF-8"></head></html>"#);
        assert_eq!(facts.charset.as_deref(), Some("utf-8"));
    }

    #[test]
    fn test_charset_http_equiv() {
        let facts = extract_from(
            r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1"></head></html>"#,
        );
        assert_eq!(facts.charset.as_deref(), Some("iso-8859-1"));
    }

    #[test]
    fn test_og_properties_in_order() {
        let facts = extract_from(
            r#"<html><head>
            <meta property="og:title" content="T">
            <meta property="og:image" content="https://example.com/i.png">
            </head></html>"#,
        );
        assert_eq!(facts.og_properties.len(), 2);
        assert_eq!(facts.og_properties[0].0, "og:title");
    }

    #[test]
    fn test_hreflang() {
        let facts = extract_from(
            r#"<html><head>
            <link rel="alternate" hreflang="en" href="/en">
            <link rel="alternate" hreflang="de" href="/de">
            </head></html>"#,
        );
        assert_eq!(facts.hreflang, vec!["en".to_string(), "de".to_string()]);
    }

    #[test]
    fn test_robots_meta() {
        let facts = extract_from(
            r#"<html><head><meta name="robots" content="noindex, nofollow"></head></html>"#,
        );
        assert_eq!(facts.robots_meta.as_deref(), Some("noindex, nofollow"));
    }
}
