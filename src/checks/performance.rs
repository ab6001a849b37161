//! Performance checks: timing, transfer size, request volume, DOM shape,
//! and the asset-probe-backed cache/weight/redirect inspections

use crate::analyzer::AnalysisContext;
use crate::checks::{Check, CheckResult, Importance, NamedResult};
use crate::facts::AssetKind;
use async_trait::async_trait;
use serde_json::json;

/// The performance category in insertion order
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(LoadTimeCheck),
        Box::new(TtfbCheck),
        Box::new(PageSizeCheck),
        Box::new(RequestCountCheck),
        Box::new(DomSizeCheck),
        Box::new(TextRatioCheck),
        Box::new(AssetCachingCheck),
        Box::new(AssetRedirectCheck),
        Box::new(ImageFormatCheck),
        Box::new(ImageWeightCheck),
    ]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total load time stays under the configured maximum
struct LoadTimeCheck;

#[async_trait]
impl Check for LoadTimeCheck {
    fn names(&self) -> &'static [&'static str] {
        &["load_time"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let maximum = ctx.config().thresholds.max_load_time;
        let seconds = round2(ctx.stats().total_time.as_secs_f64());

        let result = CheckResult::verdict(Importance::High, json!(seconds), seconds <= maximum, || {
            format!("Page loaded in {:.2} s, maximum is {:.2} s", seconds, maximum)
        });

        vec![NamedResult::new("load_time", result)]
    }
}

/// Time to first byte stays under the configured maximum
struct TtfbCheck;

#[async_trait]
impl Check for TtfbCheck {
    fn names(&self) -> &'static [&'static str] {
        &["time_to_first_byte"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let maximum = ctx.config().thresholds.max_ttfb;
        let seconds = round2(ctx.stats().ttfb.as_secs_f64());

        let result =
            CheckResult::verdict(Importance::Medium, json!(seconds), seconds <= maximum, || {
                format!(
                    "Time to first byte was {:.2} s, maximum is {:.2} s",
                    seconds, maximum
                )
            });

        vec![NamedResult::new("time_to_first_byte", result)]
    }
}

/// Downloaded page size stays under the configured maximum
struct PageSizeCheck;

#[async_trait]
impl Check for PageSizeCheck {
    fn names(&self) -> &'static [&'static str] {
        &["page_size"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let maximum = ctx.config().thresholds.max_page_size;
        let size = ctx.stats().download_size;

        let result = CheckResult::verdict(Importance::Medium, json!(size), size <= maximum, || {
            format!("Page body is {} bytes, maximum is {}", size, maximum)
        });

        vec![NamedResult::new("page_size", result)]
    }
}

/// Number of HTTP requests to render the page stays within budget
struct RequestCountCheck;

#[async_trait]
impl Check for RequestCountCheck {
    fn names(&self) -> &'static [&'static str] {
        &["http_requests"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let maximum = ctx.config().thresholds.max_http_requests;
        let count = ctx.facts().assets.request_count();

        let result = CheckResult::verdict(Importance::Medium, json!(count), count <= maximum, || {
            format!("Rendering issues {} HTTP requests, maximum is {}", count, maximum)
        });

        vec![NamedResult::new("http_requests", result)]
    }
}

/// DOM node count stays within budget
struct DomSizeCheck;

#[async_trait]
impl Check for DomSizeCheck {
    fn names(&self) -> &'static [&'static str] {
        &["dom_size"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let maximum = ctx.config().thresholds.max_dom_nodes;
        let nodes = ctx.facts().document.dom_nodes;

        let result = CheckResult::verdict(Importance::Low, json!(nodes), nodes <= maximum, || {
            format!("Document has {} element nodes, maximum is {}", nodes, maximum)
        });

        vec![NamedResult::new("dom_size", result)]
    }
}

/// Visible text makes up a reasonable share of the markup
struct TextRatioCheck;

#[async_trait]
impl Check for TextRatioCheck {
    fn names(&self) -> &'static [&'static str] {
        &["text_ratio"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let minimum = ctx.config().thresholds.min_text_ratio;
        let ratio = round2(ctx.facts().document.text_ratio);

        let result = CheckResult::verdict(Importance::Low, json!(ratio), ratio >= minimum, || {
            format!(
                "Visible text is {:.1}% of the markup, minimum is {:.1}%",
                ratio, minimum
            )
        });

        vec![NamedResult::new("text_ratio", result)]
    }
}

/// Scripts and stylesheets are served with caching headers
///
/// Probes each unique script/stylesheet URL through the shared HEAD
/// cache; unreachable assets are skipped rather than counted against the
/// page.
struct AssetCachingCheck;

#[async_trait]
impl Check for AssetCachingCheck {
    fn names(&self) -> &'static [&'static str] {
        &["asset_caching"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let assets = &ctx.facts().assets;
        let mut urls = assets.urls_of(AssetKind::Script);
        urls.extend(assets.urls_of(AssetKind::Stylesheet));

        let mut checked = 0usize;
        let mut uncached: Vec<&str> = Vec::new();

        for url in &urls {
            let Some(probe) = ctx.probe_asset(url).await else {
                continue;
            };
            checked += 1;
            if !probe.has_cache_headers() {
                uncached.push(url);
            }
        }

        let uncached_count = uncached.len();
        let value = json!({ "checked": checked, "uncached": uncached });
        let result = CheckResult::verdict(Importance::Medium, value, uncached_count == 0, || {
            format!(
                "{} of {} static assets are served without caching headers",
                uncached_count, checked
            )
        });

        vec![NamedResult::new("asset_caching", result)]
    }
}

/// Static assets are referenced at their final URL, not through redirects
struct AssetRedirectCheck;

#[async_trait]
impl Check for AssetRedirectCheck {
    fn names(&self) -> &'static [&'static str] {
        &["asset_redirects"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let assets = &ctx.facts().assets;
        let mut urls = assets.urls_of(AssetKind::Script);
        urls.extend(assets.urls_of(AssetKind::Stylesheet));

        let mut redirected: Vec<String> = Vec::new();
        for url in &urls {
            if let Some(probe) = ctx.probe_asset(url).await {
                if probe.final_url != *url {
                    redirected.push((*url).to_string());
                }
            }
        }

        let redirected_count = redirected.len();
        let value = json!(redirected);
        let result = CheckResult::verdict(Importance::Low, value, redirected_count == 0, || {
            format!("{} assets are loaded through redirects", redirected_count)
        });

        vec![NamedResult::new("asset_redirects", result)]
    }
}

/// Raster images use modern formats
struct ImageFormatCheck;

#[async_trait]
impl Check for ImageFormatCheck {
    fn names(&self) -> &'static [&'static str] {
        &["modern_image_formats"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let modern = &ctx.config().thresholds.modern_image_formats;

        let legacy: Vec<&str> = ctx
            .facts()
            .media
            .images
            .iter()
            .filter(|image| {
                image
                    .format
                    .as_ref()
                    .is_some_and(|format| !modern.contains(format))
            })
            .filter_map(|image| image.resolved.as_deref())
            .collect();

        let legacy_count = legacy.len();
        let value = json!({ "legacy_format": legacy });
        let result = CheckResult::verdict(Importance::Low, value, legacy_count == 0, || {
            format!("{} images use legacy formats", legacy_count)
        });

        vec![NamedResult::new("modern_image_formats", result)]
    }
}

/// No image exceeds the per-image byte budget, and the largest image
/// stays under its own cap
///
/// Emits two results from one probe pass: `image_sizes` and
/// `largest_image`.
struct ImageWeightCheck;

#[async_trait]
impl Check for ImageWeightCheck {
    fn names(&self) -> &'static [&'static str] {
        &["image_sizes", "largest_image"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let thresholds = &ctx.config().thresholds;

        let mut oversized: Vec<String> = Vec::new();
        let mut largest: Option<(String, u64)> = None;

        for url in ctx.facts().media.probe_urls() {
            let Some(probe) = ctx.probe_asset(url).await else {
                continue;
            };
            let Some(bytes) = probe.content_length else {
                continue;
            };

            if bytes > thresholds.max_image_bytes {
                oversized.push(url.to_string());
            }
            if largest.as_ref().map(|(_, b)| bytes > *b).unwrap_or(true) {
                largest = Some((url.to_string(), bytes));
            }
        }

        let oversized_count = oversized.len();
        let sizes_value = json!({ "oversized": oversized });
        let sizes =
            CheckResult::verdict(Importance::Medium, sizes_value, oversized_count == 0, || {
                format!(
                    "{} images exceed {} bytes",
                    oversized_count, thresholds.max_image_bytes
                )
            });

        let largest_result = match largest {
            Some((url, bytes)) => CheckResult::verdict(
                Importance::Low,
                json!({ "url": url, "bytes": bytes }),
                bytes <= thresholds.max_largest_image_bytes,
                || {
                    format!(
                        "Largest image is {} bytes, maximum is {}",
                        bytes, thresholds.max_largest_image_bytes
                    )
                },
            ),
            None => CheckResult::pass(Importance::Low, json!(null)),
        };

        vec![
            NamedResult::new("image_sizes", sizes),
            NamedResult::new("largest_image", largest_result),
        ]
    }
}
