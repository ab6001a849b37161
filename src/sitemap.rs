//! Sitemap-driven multi-page crawl
//!
//! Fetches a sitemap, keeps its same-domain `<url><loc>` entries in
//! document order, and runs the analyzer once per entry with a
//! randomized politeness delay in between. A single page failure is
//! logged and skipped; only an unfetchable sitemap fails the crawl.

use crate::analyzer::{AnalysisResult, Analyzer};
use crate::url::{is_internal, normalize_input};
use crate::{GaugeError, Result};
use rand::Rng;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Politeness delay bounds between page analyses, in milliseconds
const DELAY_MIN_MS: u64 = 750;
const DELAY_MAX_MS: u64 = 1250;

/// Crawls every same-domain page listed in a sitemap
pub struct SitemapCrawler {
    analyzer: Analyzer,
}

impl SitemapCrawler {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    /// The wrapped analyzer
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Fetches the sitemap and analyzes up to `max_pages` same-domain
    /// entries, in document order
    ///
    /// `max_pages` of `None` falls back to the configured cap, and an
    /// unset cap means unlimited. Per-URL analysis failures are skipped;
    /// the crawl itself fails only when the sitemap cannot be fetched.
    pub async fn crawl(
        &self,
        sitemap_url: &str,
        max_pages: Option<usize>,
    ) -> Result<Vec<AnalysisResult>> {
        let sitemap_url = normalize_input(sitemap_url)?;
        let cap = max_pages.or(self.analyzer.config().sitemap.max_pages);

        let body = self.fetch_sitemap(&sitemap_url).await?;
        let entries = extract_entries(&body, &sitemap_url);
        tracing::info!(
            "Sitemap {} lists {} same-domain pages (cap: {})",
            sitemap_url,
            entries.len(),
            cap.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()),
        );

        let mut reports = Vec::new();
        for entry in entries {
            if let Some(cap) = cap {
                if reports.len() >= cap {
                    tracing::info!("Page cap of {} reached, stopping crawl", cap);
                    break;
                }
            }

            if !reports.is_empty() {
                tokio::time::sleep(politeness_delay()).await;
            }

            match self.analyzer.analyze(entry.as_str()).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", entry, e);
                }
            }
        }

        Ok(reports)
    }

    async fn fetch_sitemap(&self, url: &Url) -> Result<String> {
        let response = self
            .analyzer
            .client()
            .get(url.clone())
            .send()
            .await
            .map_err(|e| GaugeError::Sitemap {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(GaugeError::Sitemap {
                url: url.to_string(),
                message: format!("HTTP {}", response.status().as_u16()),
            });
        }

        response.text().await.map_err(|e| GaugeError::Sitemap {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Extracts same-domain `<url><loc>` entries from a sitemap body
///
/// The body is parsed with the tolerant markup parser, so slightly
/// malformed sitemaps (or HTML-wrapped ones) still yield their entries.
/// Off-domain entries are dropped and never fetched.
fn extract_entries(body: &str, sitemap_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(body);

    let Ok(selector) = Selector::parse("url loc") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let text = el.text().collect::<String>();
            Url::parse(text.trim()).ok()
        })
        .filter(|entry| is_internal(entry, sitemap_url))
        .collect()
}

/// A randomized interval between page analyses
fn politeness_delay() -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(DELAY_MIN_MS..=DELAY_MAX_MS))
}
