//! SEO checks: titles, descriptions, canonical links, headings, alt
//! coverage, content volume, link budget, and the robots/404 probes

use crate::analyzer::AnalysisContext;
use crate::checks::{Check, CheckResult, Importance, NamedResult};
use async_trait::async_trait;
use serde_json::json;

/// The SEO category in insertion order
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(TitleCheck),
        Box::new(MetaDescriptionCheck),
        Box::new(CanonicalCheck),
        Box::new(HeadingsCheck),
        Box::new(ImageAltCheck),
        Box::new(WordCountCheck),
        Box::new(LinkCountCheck),
        Box::new(RobotsTxtCheck),
        Box::new(NotFoundPageCheck),
    ]
}

/// Title presence and length bounds
struct TitleCheck;

#[async_trait]
impl Check for TitleCheck {
    fn names(&self) -> &'static [&'static str] {
        &["title"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let thresholds = &ctx.config().thresholds;

        let result = match ctx.facts().head.title.as_deref() {
            None => CheckResult::fail(Importance::High, json!(null), "No title tag found"),
            Some("") => CheckResult::fail(Importance::High, json!(""), "Title tag is empty"),
            Some(title) => {
                let length = title.chars().count();
                if length < thresholds.title_min_length {
                    CheckResult::fail(
                        Importance::High,
                        json!(title),
                        format!(
                            "Title is {} characters, minimum is {}",
                            length, thresholds.title_min_length
                        ),
                    )
                } else if length > thresholds.title_max_length {
                    CheckResult::fail(
                        Importance::High,
                        json!(title),
                        format!(
                            "Title is {} characters, maximum is {}",
                            length, thresholds.title_max_length
                        ),
                    )
                } else {
                    CheckResult::pass(Importance::High, json!(title))
                }
            }
        };

        vec![NamedResult::new("title", result)]
    }
}

/// Meta description presence and length bounds
struct MetaDescriptionCheck;

#[async_trait]
impl Check for MetaDescriptionCheck {
    fn names(&self) -> &'static [&'static str] {
        &["meta_description"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let thresholds = &ctx.config().thresholds;

        let result = match ctx.facts().head.meta_description.as_deref() {
            None | Some("") => CheckResult::fail(
                Importance::Medium,
                json!(null),
                "No meta description found",
            ),
            Some(description) => {
                let length = description.chars().count();
                let within = (thresholds.description_min_length
                    ..=thresholds.description_max_length)
                    .contains(&length);
                CheckResult::verdict(Importance::Medium, json!(description), within, || {
                    format!(
                        "Meta description is {} characters, expected {} to {}",
                        length,
                        thresholds.description_min_length,
                        thresholds.description_max_length
                    )
                })
            }
        };

        vec![NamedResult::new("meta_description", result)]
    }
}

/// Canonical link presence, plus whether it references the page itself
struct CanonicalCheck;

#[async_trait]
impl Check for CanonicalCheck {
    fn names(&self) -> &'static [&'static str] {
        &["canonical_tag", "canonical_self_reference"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let head = &ctx.facts().head;

        let Some(canonical) = head.canonical.as_deref() else {
            return vec![NamedResult::new(
                "canonical_tag",
                CheckResult::fail(Importance::Medium, json!(null), "No canonical link found"),
            )];
        };

        let mut results = vec![NamedResult::new(
            "canonical_tag",
            CheckResult::pass(Importance::Medium, json!(canonical)),
        )];

        let self_reference = match head.canonical_resolved.as_ref() {
            Some(resolved) => {
                let page = ctx.url().as_str().trim_end_matches('/');
                let target = resolved.as_str().trim_end_matches('/');
                CheckResult::verdict(
                    Importance::Low,
                    json!(resolved.as_str()),
                    page == target,
                    || format!("Canonical link points to {} instead of the page itself", resolved),
                )
            }
            None => CheckResult::fail(
                Importance::Low,
                json!(canonical),
                "Canonical link could not be resolved to an absolute URL",
            ),
        };
        results.push(NamedResult::new("canonical_self_reference", self_reference));

        results
    }
}

/// Exactly one h1, and no skipped heading levels
struct HeadingsCheck;

#[async_trait]
impl Check for HeadingsCheck {
    fn names(&self) -> &'static [&'static str] {
        &["h1_heading", "heading_order"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let headings = &ctx.facts().headings;

        let h1_texts: Vec<&str> = headings
            .iter()
            .filter(|h| h.level == 1)
            .map(|h| h.text.as_str())
            .collect();

        let h1_result = match h1_texts.len() {
            0 => CheckResult::fail(Importance::High, json!([]), "Page has no h1 heading"),
            1 => CheckResult::pass(Importance::High, json!(h1_texts)),
            n => CheckResult::fail(
                Importance::High,
                json!(h1_texts),
                format!("Page has {} h1 headings, expected exactly one", n),
            ),
        };

        let levels: Vec<u8> = headings.iter().map(|h| h.level).collect();
        let skip = levels
            .windows(2)
            .find(|pair| pair[1] > pair[0] && pair[1] - pair[0] > 1);
        let order_result = match skip {
            Some(pair) => CheckResult::fail(
                Importance::Low,
                json!(levels),
                format!("Heading level jumps from h{} to h{}", pair[0], pair[1]),
            ),
            None => CheckResult::pass(Importance::Low, json!(levels)),
        };

        vec![
            NamedResult::new("h1_heading", h1_result),
            NamedResult::new("heading_order", order_result),
        ]
    }
}

/// Every image carries an alt attribute
struct ImageAltCheck;

#[async_trait]
impl Check for ImageAltCheck {
    fn names(&self) -> &'static [&'static str] {
        &["image_alt_attributes"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let media = &ctx.facts().media;
        let total = media.images.len();
        let missing = media.missing_alt_count();

        let value = json!({ "total": total, "missing_alt": missing });
        let result = CheckResult::verdict(Importance::Medium, value, missing == 0, || {
            format!("{} of {} images have no alt attribute", missing, total)
        });

        vec![NamedResult::new("image_alt_attributes", result)]
    }
}

/// Visible body text meets the minimum word count
struct WordCountCheck;

#[async_trait]
impl Check for WordCountCheck {
    fn names(&self) -> &'static [&'static str] {
        &["word_count"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let minimum = ctx.config().thresholds.min_word_count;
        let count = ctx.facts().document.word_count;

        let result = CheckResult::verdict(Importance::Medium, json!(count), count >= minimum, || {
            format!("Page has {} words, minimum is {}", count, minimum)
        });

        vec![NamedResult::new("word_count", result)]
    }
}

/// Total link volume stays within the configured budget
struct LinkCountCheck;

#[async_trait]
impl Check for LinkCountCheck {
    fn names(&self) -> &'static [&'static str] {
        &["link_count"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let links = &ctx.facts().links;
        let maximum = ctx.config().thresholds.max_links;

        let internal = links.internal_count();
        let external = links.external_count();
        let total = links.http_count();

        let value = json!({ "internal": internal, "external": external, "total": total });
        let mut result = CheckResult::verdict(Importance::Low, value, total <= maximum, || {
            format!("Page has {} links, maximum is {}", total, maximum)
        });

        let empty_anchors = links.empty_anchor_count();
        if empty_anchors > 0 {
            result = result.with_warning(format!("{} links have empty anchor text", empty_anchors));
        }

        vec![NamedResult::new("link_count", result)]
    }
}

/// robots.txt exists and does not lock the page out
///
/// An unreachable probe is a failing signal; a missing file fails with
/// its own message; a file that disallows the analyzed page fails too.
struct RobotsTxtCheck;

#[async_trait]
impl Check for RobotsTxtCheck {
    fn names(&self) -> &'static [&'static str] {
        &["robots_txt"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let result = match ctx.robots() {
            None => CheckResult::fail(
                Importance::Medium,
                json!(null),
                "robots.txt could not be probed",
            ),
            Some(probe) => {
                let value = json!({
                    "present": probe.present,
                    "allows_page": probe.allows_page,
                    "sitemaps": probe.sitemaps,
                });
                if !probe.present {
                    CheckResult::fail(Importance::Medium, value, "No robots.txt file found")
                } else if !probe.allows_page {
                    CheckResult::fail(
                        Importance::Medium,
                        value,
                        "robots.txt disallows the analyzed page",
                    )
                } else {
                    CheckResult::pass(Importance::Medium, value)
                }
            }
        };

        vec![NamedResult::new("robots_txt", result)]
    }
}

/// Nonexistent paths answer with a real 404
struct NotFoundPageCheck;

#[async_trait]
impl Check for NotFoundPageCheck {
    fn names(&self) -> &'static [&'static str] {
        &["not_found_page"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let result = match ctx.not_found() {
            None => CheckResult::fail(
                Importance::Medium,
                json!(null),
                "404 behavior could not be probed",
            ),
            Some(probe) => CheckResult::verdict(
                Importance::Medium,
                json!(probe.status),
                probe.returns_not_found(),
                || {
                    format!(
                        "Nonexistent path answered with HTTP {} instead of 404",
                        probe.status
                    )
                },
            ),
        };

        vec![NamedResult::new("not_found_page", result)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::probes::{NotFoundProbe, RobotsProbe};
    use crate::checks::testutil::TestPage;

    #[tokio::test]
    async fn test_title_within_bounds_passes() {
        let ctx = TestPage::new(
            "<html><head><title>Test Page Title</title></head><body></body></html>",
        )
        .build();
        let results = TitleCheck.run(&ctx).await;
        assert_eq!(results[0].name, "title");
        assert!(results[0].result.passed);
        assert_eq!(results[0].result.value, json!("Test Page Title"));
        assert_eq!(results[0].result.importance, Importance::High);
    }

    #[tokio::test]
    async fn test_title_missing_fails() {
        let ctx = TestPage::new("<html><head></head><body></body></html>").build();
        let results = TitleCheck.run(&ctx).await;
        assert!(!results[0].result.passed);
        assert_eq!(results[0].result.value, json!(null));
        assert!(!results[0].result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_title_too_short_fails() {
        let ctx = TestPage::new("<html><head><title>Tiny</title></head></html>").build();
        let results = TitleCheck.run(&ctx).await;
        assert!(!results[0].result.passed);
    }

    #[tokio::test]
    async fn test_canonical_self_reference() {
        let ctx = TestPage::new(
            r#"<html><head><link rel="canonical" href="https://example.com/page"></head></html>"#,
        )
        .build();
        let results = CanonicalCheck.run(&ctx).await;
        assert_eq!(results.len(), 2);
        assert!(results[0].result.passed);
        assert_eq!(results[1].name, "canonical_self_reference");
        assert!(results[1].result.passed);
    }

    #[tokio::test]
    async fn test_canonical_elsewhere_fails_self_reference() {
        let ctx = TestPage::new(
            r#"<html><head><link rel="canonical" href="https://example.com/other"></head></html>"#,
        )
        .build();
        let results = CanonicalCheck.run(&ctx).await;
        assert!(results[0].result.passed);
        assert!(!results[1].result.passed);
    }

    #[tokio::test]
    async fn test_canonical_missing_emits_single_result() {
        let ctx = TestPage::new("<html><head></head></html>").build();
        let results = CanonicalCheck.run(&ctx).await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].result.passed);
    }

    #[tokio::test]
    async fn test_single_h1_passes() {
        let ctx = TestPage::new("<html><body><h1>Main</h1><h2>Sub</h2></body></html>").build();
        let results = HeadingsCheck.run(&ctx).await;
        assert!(results[0].result.passed);
        assert!(results[1].result.passed);
    }

    #[tokio::test]
    async fn test_skipped_heading_level_fails_order() {
        let ctx = TestPage::new("<html><body><h1>Main</h1><h3>Deep</h3></body></html>").build();
        let results = HeadingsCheck.run(&ctx).await;
        assert!(results[0].result.passed);
        assert!(!results[1].result.passed);
    }

    #[tokio::test]
    async fn test_missing_alt_fails() {
        let ctx = TestPage::new(r#"<html><body><img src="/a.png"></body></html>"#).build();
        let results = ImageAltCheck.run(&ctx).await;
        assert!(!results[0].result.passed);
    }

    #[tokio::test]
    async fn test_no_images_passes_alt_check() {
        let ctx = TestPage::new("<html><body></body></html>").build();
        let results = ImageAltCheck.run(&ctx).await;
        assert!(results[0].result.passed);
    }

    #[tokio::test]
    async fn test_word_count_threshold() {
        let mut page = TestPage::new("<html><body>only a few words here</body></html>");
        page.config.thresholds.min_word_count = 3;
        let results = WordCountCheck.run(&page.build()).await;
        assert!(results[0].result.passed);
    }

    #[tokio::test]
    async fn test_robots_probe_absent_fails() {
        let ctx = TestPage::new("<html></html>").build();
        let results = RobotsTxtCheck.run(&ctx).await;
        assert!(!results[0].result.passed);
    }

    #[tokio::test]
    async fn test_robots_present_and_allowing_passes() {
        let mut page = TestPage::new("<html></html>");
        page.robots = Some(RobotsProbe {
            present: true,
            body: "User-agent: *\nAllow: /".to_string(),
            allows_page: true,
            sitemaps: vec![],
        });
        let results = RobotsTxtCheck.run(&page.build()).await;
        assert!(results[0].result.passed);
    }

    #[tokio::test]
    async fn test_not_found_probe() {
        let mut page = TestPage::new("<html></html>");
        page.not_found = Some(NotFoundProbe {
            probed_path: "/x".to_string(),
            status: 200,
        });
        let results = NotFoundPageCheck.run(&page.build()).await;
        assert!(!results[0].result.passed);
    }
}
