//! Miscellaneous checks: document hygiene, structured data, well-known
//! files, and DNS-based email security

use crate::analyzer::AnalysisContext;
use crate::checks::{Check, CheckResult, Importance, NamedResult};
use async_trait::async_trait;
use serde_json::json;

/// The miscellaneous category in insertion order
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(DoctypeCheck),
        Box::new(LanguageCheck),
        Box::new(CharsetCheck),
        Box::new(ViewportCheck),
        Box::new(FaviconCheck),
        Box::new(DeprecatedTagsCheck),
        Box::new(StructuredDataCheck),
        Box::new(LlmsTxtCheck),
        Box::new(EmailSecurityCheck),
    ]
}

/// The markup declares a doctype
struct DoctypeCheck;

#[async_trait]
impl Check for DoctypeCheck {
    fn names(&self) -> &'static [&'static str] {
        &["doctype"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let present = ctx.facts().document.has_doctype;
        let result = CheckResult::verdict(Importance::Low, json!(present), present, || {
            "Document has no doctype declaration".to_string()
        });

        vec![NamedResult::new("doctype", result)]
    }
}

/// The html element declares a language
struct LanguageCheck;

#[async_trait]
impl Check for LanguageCheck {
    fn names(&self) -> &'static [&'static str] {
        &["html_language"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let lang = ctx.facts().document.lang.as_deref();
        let result = CheckResult::verdict(Importance::Medium, json!(lang), lang.is_some(), || {
            "The html element has no lang attribute".to_string()
        });

        vec![NamedResult::new("html_language", result)]
    }
}

/// A character set is declared
struct CharsetCheck;

#[async_trait]
impl Check for CharsetCheck {
    fn names(&self) -> &'static [&'static str] {
        &["charset"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let charset = ctx.facts().head.charset.as_deref();
        let result = CheckResult::verdict(Importance::Low, json!(charset), charset.is_some(), || {
            "No character set declared in the document head".to_string()
        });

        vec![NamedResult::new("charset", result)]
    }
}

/// A viewport meta tag makes the page mobile-renderable
struct ViewportCheck;

#[async_trait]
impl Check for ViewportCheck {
    fn names(&self) -> &'static [&'static str] {
        &["viewport_meta"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let viewport = ctx.facts().head.viewport.as_deref();
        let result =
            CheckResult::verdict(Importance::Medium, json!(viewport), viewport.is_some(), || {
                "No viewport meta tag found".to_string()
            });

        vec![NamedResult::new("viewport_meta", result)]
    }
}

/// A favicon is declared
struct FaviconCheck;

#[async_trait]
impl Check for FaviconCheck {
    fn names(&self) -> &'static [&'static str] {
        &["favicon"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let favicon = ctx.facts().head.favicon.as_deref();
        let result = CheckResult::verdict(Importance::Low, json!(favicon), favicon.is_some(), || {
            "No favicon link found".to_string()
        });

        vec![NamedResult::new("favicon", result)]
    }
}

/// No deprecated presentational tags are used
struct DeprecatedTagsCheck;

#[async_trait]
impl Check for DeprecatedTagsCheck {
    fn names(&self) -> &'static [&'static str] {
        &["deprecated_tags"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let found = &ctx.facts().document.deprecated_tags;

        let value = json!(found
            .iter()
            .map(|(tag, count)| json!({ "tag": tag, "count": count }))
            .collect::<Vec<_>>());

        let result = CheckResult::verdict(Importance::Medium, value, found.is_empty(), || {
            let tags: Vec<&str> = found.iter().map(|(tag, _)| tag.as_str()).collect();
            format!("Deprecated tags in use: {}", tags.join(", "))
        });

        vec![NamedResult::new("deprecated_tags", result)]
    }
}

/// Valid structured data is present
///
/// Unparsable JSON-LD blocks fail the check with the parse messages as
/// errors; malformed page content is a finding here, never an engine
/// failure.
struct StructuredDataCheck;

#[async_trait]
impl Check for StructuredDataCheck {
    fn names(&self) -> &'static [&'static str] {
        &["structured_data"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let facts = &ctx.facts().structured_data;

        let types: Vec<&str> = facts
            .json_ld
            .iter()
            .flat_map(|block| block.types.iter().map(String::as_str))
            .collect();
        let value = json!({
            "json_ld_blocks": facts.json_ld.len(),
            "types": types,
            "microdata_scopes": facts.microdata_scopes,
        });

        let invalid = facts.invalid_blocks();
        let result = if !invalid.is_empty() {
            let mut result = CheckResult::fail(
                Importance::Low,
                value,
                format!("{} JSON-LD blocks failed to parse", invalid.len()),
            );
            for block in invalid {
                if let Some(error) = &block.error {
                    result = result.with_error(error.clone());
                }
            }
            result
        } else {
            CheckResult::verdict(Importance::Low, value, facts.has_any(), || {
                "No structured data found".to_string()
            })
        };

        vec![NamedResult::new("structured_data", result)]
    }
}

/// The well-known llms.txt file is served
struct LlmsTxtCheck;

#[async_trait]
impl Check for LlmsTxtCheck {
    fn names(&self) -> &'static [&'static str] {
        &["llms_txt"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let probed = ctx.facts().domain.as_ref().and_then(|d| d.llms_txt);

        let result = match probed {
            None => CheckResult::fail(Importance::Low, json!(null), "llms.txt could not be probed"),
            Some(present) => CheckResult::verdict(Importance::Low, json!(present), present, || {
                "No llms.txt file served".to_string()
            }),
        };

        vec![NamedResult::new("llms_txt", result)]
    }
}

/// SPF and DMARC records exist for the page's domain
///
/// Emits `spf_record` and `dmarc_record` from one DNS fact set.
struct EmailSecurityCheck;

#[async_trait]
impl Check for EmailSecurityCheck {
    fn names(&self) -> &'static [&'static str] {
        &["spf_record", "dmarc_record"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let domain = ctx.facts().domain.as_ref();

        let spf = domain.and_then(|d| d.spf_record.as_deref());
        let dmarc = domain.and_then(|d| d.dmarc_record.as_deref());

        vec![
            NamedResult::new(
                "spf_record",
                CheckResult::verdict(Importance::Low, json!(spf), spf.is_some(), || {
                    "No SPF record published".to_string()
                }),
            ),
            NamedResult::new(
                "dmarc_record",
                CheckResult::verdict(Importance::Low, json!(dmarc), dmarc.is_some(), || {
                    "No DMARC record published".to_string()
                }),
            ),
        ]
    }
}
