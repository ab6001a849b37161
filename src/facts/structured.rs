//! Structured-data facts: JSON-LD blocks and microdata markers
//!
//! Unparsable JSON-LD is recorded on the block, never raised; malformed
//! page content is a rule-level finding, not an engine failure.

use scraper::{Html, Selector};
use serde_json::Value;

/// One structured-data block found on the page
#[derive(Debug, Clone)]
pub struct StructuredBlock {
    /// Schema.org types declared by the block (`@type`, flattened over
    /// `@graph`)
    pub types: Vec<String>,

    /// Parse error for an invalid block; `None` when the JSON parsed
    pub error: Option<String>,
}

/// All structured-data facts for a page
#[derive(Debug, Clone, Default)]
pub struct StructuredDataFacts {
    /// JSON-LD blocks in document order
    pub json_ld: Vec<StructuredBlock>,

    /// Number of elements carrying microdata itemscope attributes
    pub microdata_scopes: usize,
}

impl StructuredDataFacts {
    /// Whether any valid structured data was found
    pub fn has_any(&self) -> bool {
        self.microdata_scopes > 0 || self.json_ld.iter().any(|b| b.error.is_none())
    }

    /// Blocks that failed to parse
    pub fn invalid_blocks(&self) -> Vec<&StructuredBlock> {
        self.json_ld.iter().filter(|b| b.error.is_some()).collect()
    }
}

/// Extracts structured-data facts
pub fn extract(document: &Html) -> StructuredDataFacts {
    let json_ld = match Selector::parse(r#"script[type="application/ld+json"]"#) {
        Ok(selector) => document
            .select(&selector)
            .map(|el| parse_block(&el.text().collect::<String>()))
            .collect(),
        Err(_) => Vec::new(),
    };

    let microdata_scopes = Selector::parse("[itemscope]")
        .map(|s| document.select(&s).count())
        .unwrap_or(0);

    StructuredDataFacts {
        json_ld,
        microdata_scopes,
    }
}

fn parse_block(raw: &str) -> StructuredBlock {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => StructuredBlock {
            types: collect_types(&value),
            error: None,
        },
        Err(e) => StructuredBlock {
            types: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

/// Collects `@type` values, descending into `@graph` and top-level arrays
fn collect_types(value: &Value) -> Vec<String> {
    let mut types = Vec::new();
    collect_types_into(value, &mut types);
    types
}

fn collect_types_into(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => out.push(t.clone()),
                Some(Value::Array(items)) => {
                    out.extend(items.iter().filter_map(|v| v.as_str().map(String::from)));
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types_into(graph, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_types_into(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_from(html: &str) -> StructuredDataFacts {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn test_valid_json_ld() {
        let facts = extract_from(
            r#"<html><head><script type="application/ld+json">
            {"@context": "https://schema.org", "@type": "Article", "headline": "X"}
            </script></head></html>"#,
        );
        assert_eq!(facts.json_ld.len(), 1);
        assert_eq!(facts.json_ld[0].types, vec!["Article".to_string()]);
        assert!(facts.has_any());
    }

    #[test]
    fn test_invalid_json_ld_recorded_not_raised() {
        let facts = extract_from(
            r#"<html><head><script type="application/ld+json">{not json</script></head></html>"#,
        );
        assert_eq!(facts.json_ld.len(), 1);
        assert!(facts.json_ld[0].error.is_some());
        assert!(!facts.has_any());
        assert_eq!(facts.invalid_blocks().len(), 1);
    }

    #[test]
    fn test_graph_types_flattened() {
        let facts = extract_from(
            r#"<html><head><script type="application/ld+json">
            {"@graph": [{"@type": "Organization"}, {"@type": "WebSite"}]}
            </script></head></html>"#,
        );
        assert_eq!(
            facts.json_ld[0].types,
            vec!["Organization".to_string(), "WebSite".to_string()]
        );
    }

    #[test]
    fn test_microdata_scopes() {
        let facts = extract_from(
            r#"<html><body><div itemscope itemtype="https://schema.org/Person"></div></body></html>"#,
        );
        assert_eq!(facts.microdata_scopes, 1);
        assert!(facts.has_any());
    }

    #[test]
    fn test_no_structured_data() {
        let facts = extract_from("<html><body></body></html>");
        assert!(!facts.has_any());
        assert!(facts.json_ld.is_empty());
    }
}
