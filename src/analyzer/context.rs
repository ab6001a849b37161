//! The analysis context: everything a check may read
//!
//! Built once per page by the orchestrator after every extractor and
//! probe has finished, consumed read-only by every check in that page's
//! run, and discarded after scoring. No check ever observes a partially
//! populated context.

use crate::analyzer::assets::{AssetProbe, AssetProbeCache};
use crate::analyzer::fetch::RequestStats;
use crate::analyzer::probes::{NotFoundProbe, RobotsProbe};
use crate::config::Config;
use crate::facts::PageFacts;
use crate::url::{is_internal, resolve_url, Resolved};
use reqwest::header::HeaderMap;
use std::sync::Arc;
use url::Url;

/// Immutable per-page bundle handed to every check
pub struct AnalysisContext {
    url: Url,
    status: u16,
    headers: HeaderMap,
    stats: RequestStats,
    body: String,
    facts: PageFacts,
    robots: Option<RobotsProbe>,
    not_found: Option<NotFoundProbe>,
    config: Config,
    assets: Arc<AssetProbeCache>,
}

impl AnalysisContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        url: Url,
        status: u16,
        headers: HeaderMap,
        stats: RequestStats,
        body: String,
        facts: PageFacts,
        robots: Option<RobotsProbe>,
        not_found: Option<NotFoundProbe>,
        config: Config,
        assets: Arc<AssetProbeCache>,
    ) -> Self {
        Self {
            url,
            status,
            headers,
            stats,
            body,
            facts,
            robots,
            not_found,
            config,
            assets,
        }
    }

    /// The final page URL after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// A response header as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }

    /// The decoded response body, BOM already stripped
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn facts(&self) -> &PageFacts {
        &self.facts
    }

    /// The derived body-keyword list, most frequent first
    pub fn keywords(&self) -> &[(String, usize)] {
        &self.facts.document.keywords
    }

    pub fn robots(&self) -> Option<&RobotsProbe> {
        self.robots.as_ref()
    }

    pub fn not_found(&self) -> Option<&NotFoundProbe> {
        self.not_found.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves a raw href/src against the page URL
    pub fn resolve(&self, raw: &str) -> Resolved {
        resolve_url(raw, &self.url)
    }

    /// Classifies an absolute URL against the page host
    pub fn is_internal(&self, candidate: &Url) -> bool {
        is_internal(candidate, &self.url)
    }

    /// Probes an asset URL through the per-run coalescing HEAD cache
    pub async fn probe_asset(&self, url: &str) -> Option<AssetProbe> {
        self.assets.probe(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use std::time::Duration;

    fn test_context() -> AnalysisContext {
        AnalysisContext::new(
            Url::parse("https://example.com/page").unwrap(),
            200,
            HeaderMap::new(),
            RequestStats {
                download_size: 100,
                total_time: Duration::from_millis(500),
                ttfb: Duration::from_millis(80),
            },
            "<html></html>".to_string(),
            PageFacts::default(),
            None,
            None,
            Config::default(),
            Arc::new(AssetProbeCache::new(Client::new())),
        )
    }

    #[test]
    fn test_header_lookup_absent() {
        let ctx = test_context();
        assert!(ctx.header("content-security-policy").is_none());
    }

    #[test]
    fn test_resolution_uses_page_url() {
        let ctx = test_context();
        let resolved = ctx.resolve("/other");
        assert_eq!(
            resolved.as_http().unwrap().as_str(),
            "https://example.com/other"
        );
    }

    #[test]
    fn test_internal_classification() {
        let ctx = test_context();
        let sub = Url::parse("https://cdn.example.com/a.js").unwrap();
        let foreign = Url::parse("https://other.com/a.js").unwrap();
        assert!(ctx.is_internal(&sub));
        assert!(!ctx.is_internal(&foreign));
    }

    #[test]
    fn test_absent_probes_are_none() {
        let ctx = test_context();
        assert!(ctx.robots().is_none());
        assert!(ctx.not_found().is_none());
    }
}
