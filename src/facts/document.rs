//! Document-level facts: doctype, language, DOM shape, text statistics,
//! and the derived body-keyword list

use crate::config::Config;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Words shorter than this never count as keywords
const MIN_KEYWORD_LENGTH: usize = 4;

/// How many of the most frequent body words are kept as keywords
const KEYWORD_LIMIT: usize = 20;

/// Facts about the document as a whole
#[derive(Debug, Clone, Default)]
pub struct DocumentFacts {
    /// Whether the markup begins with a doctype declaration
    pub has_doctype: bool,

    /// The `lang` attribute of the `<html>` element
    pub lang: Option<String>,

    /// Total number of element nodes in the tree
    pub dom_nodes: usize,

    /// Deprecated tags found on the page, tag name to occurrence count
    pub deprecated_tags: Vec<(String, usize)>,

    /// Number of whitespace-separated words in the visible body text
    pub word_count: usize,

    /// Visible text bytes as a percentage of raw body bytes (0 for an
    /// empty body)
    pub text_ratio: f64,

    /// Most frequent body words, most frequent first
    pub keywords: Vec<(String, usize)>,
}

/// Extracts document-level facts
pub fn extract(document: &Html, raw_body: &str, config: &Config) -> DocumentFacts {
    let body_text = visible_body_text(document);
    let word_count = body_text.split_whitespace().count();

    let text_ratio = if raw_body.is_empty() {
        0.0
    } else {
        100.0 * body_text.len() as f64 / raw_body.len() as f64
    };

    DocumentFacts {
        has_doctype: has_doctype(raw_body),
        lang: html_lang(document),
        dom_nodes: count_element_nodes(document),
        deprecated_tags: count_deprecated_tags(document, &config.thresholds.deprecated_tags),
        word_count,
        text_ratio,
        keywords: keyword_frequencies(&body_text),
    }
}

/// Checks for a leading doctype declaration in the raw markup
fn has_doctype(raw_body: &str) -> bool {
    raw_body
        .trim_start()
        .get(..9)
        .map(|prefix| prefix.eq_ignore_ascii_case("<!doctype"))
        .unwrap_or(false)
}

fn html_lang(document: &Html) -> Option<String> {
    let selector = Selector::parse("html").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("lang"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn count_element_nodes(document: &Html) -> usize {
    document
        .tree
        .values()
        .filter(|node| node.is_element())
        .count()
}

fn count_deprecated_tags(document: &Html, deprecated: &[String]) -> Vec<(String, usize)> {
    let mut found = Vec::new();

    for tag in deprecated {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };
        let count = document.select(&selector).count();
        if count > 0 {
            found.push((tag.clone(), count));
        }
    }

    found
}

/// Collects the visible text of the body, excluding script and style
/// element content
fn visible_body_text(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    let Some(body) = document.select(&body_selector).next() else {
        return String::new();
    };

    // scraper's text() walks text nodes only, but script/style bodies are
    // text nodes too; filter them out by walking elements explicitly.
    let mut text = String::new();
    collect_text(body, &mut text);
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(t) = child.value().as_text() {
            out.push_str(t);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if name != "script" && name != "style" && name != "noscript" {
                collect_text(child_element, out);
            }
        }
    }
}

/// Derives the body-keyword list: lowercased alphanumeric words of at
/// least four characters, ranked by frequency
fn keyword_frequencies(text: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for raw_word in text.split_whitespace() {
        let word: String = raw_word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        if word.chars().count() >= MIN_KEYWORD_LENGTH {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(KEYWORD_LIMIT);
    ranked
}
