//! Heading facts: the ordered h1-h6 outline of the page

use scraper::{Html, Selector};

/// A single heading in document order
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,

    /// Trimmed text content
    pub text: String,
}

/// Extracts every h1-h6 element in document order
pub fn extract(document: &Html) -> Vec<Heading> {
    let Ok(selector) = Selector::parse("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let level = match el.value().name() {
                "h1" => 1,
                "h2" => 2,
                "h3" => 3,
                "h4" => 4,
                "h5" => 5,
                "h6" => 6,
                _ => return None,
            };
            Some(Heading {
                level,
                text: el.text().collect::<String>().trim().to_string(),
            })
        })
        .collect()
}

/// Counts headings of a given level
pub fn count_level(headings: &[Heading], level: u8) -> usize {
    headings.iter().filter(|h| h.level == level).count()
}
