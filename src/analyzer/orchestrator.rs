//! The fetch orchestrator
//!
//! Drives one page analysis end-to-end: input normalization, primary GET,
//! tolerant parsing, fact extraction, ancillary probes, context assembly,
//! check execution, scoring, and report assembly. Robots and 404 probe
//! outcomes are cached per orchestrator instance, keyed by host, so a
//! sitemap crawl over one site issues each probe once.

use crate::analyzer::assets::AssetProbeCache;
use crate::analyzer::client::build_http_client;
use crate::analyzer::context::AnalysisContext;
use crate::analyzer::fetch::fetch_page;
use crate::analyzer::probes::{probe_not_found, probe_robots, NotFoundProbe, RobotsProbe};
use crate::analyzer::render::RenderingService;
use crate::analyzer::report::{AnalysisResult, CategoryIndex};
use crate::checks::{Category, CheckRegistry, CheckResult, Importance};
use crate::config::{validate, Config};
use crate::facts::{self, domain};
use crate::score;
use crate::url::{bare_host, normalize_input};
use crate::Result;
use chrono::Utc;
use reqwest::Client;
use scraper::Html;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// The analyzer: one configured engine instance, reusable across pages
pub struct Analyzer {
    config: Config,
    client: Client,
    registry: CheckRegistry,
    robots_cache: Mutex<HashMap<String, Option<RobotsProbe>>>,
    not_found_cache: Mutex<HashMap<String, Option<NotFoundProbe>>>,
    rendering: Option<Box<dyn RenderingService>>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("has_rendering", &self.rendering.is_some())
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Creates an analyzer with the standard check catalog
    ///
    /// Configuration validation and registry construction both run here,
    /// before any network call; a duplicate check name or invalid
    /// threshold fails fast.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_registry(config, CheckRegistry::standard()?)
    }

    /// Creates an analyzer with an explicit check catalog
    pub fn with_registry(config: Config, registry: CheckRegistry) -> Result<Self> {
        validate(&config)?;
        let client = build_http_client(&config.request)?;

        Ok(Self {
            config,
            client,
            registry,
            robots_cache: Mutex::new(HashMap::new()),
            not_found_cache: Mutex::new(HashMap::new()),
            rendering: None,
        })
    }

    /// Attaches an external rendering service whose results are merged
    /// into each report
    pub fn with_rendering_service(mut self, service: Box<dyn RenderingService>) -> Self {
        self.rendering = Some(service);
        self
    }

    /// The shared HTTP client (the sitemap crawler fetches through it)
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes one page end-to-end
    ///
    /// The target may omit its scheme; `https://` is assumed. A primary
    /// fetch failure (timeout, connection error, redirect-cap overrun,
    /// non-2xx terminal status) aborts with a typed error. Every
    /// ancillary probe degrades to an absent fact instead.
    pub async fn analyze(&self, target: &str) -> Result<AnalysisResult> {
        let url = normalize_input(target)?;
        tracing::info!("Analyzing {}", url);

        let page = fetch_page(&self.client, &url).await?;

        // The parsed tree is not Send; keep it scoped so the analyze
        // future stays spawnable.
        let mut page_facts = {
            let document = Html::parse_document(&page.body);
            facts::extract_all(&document, &page.body, &page.final_url, &self.config)
        };

        let probe_timeout = Duration::from_secs(self.config.request.timeout_seconds);
        let (robots, not_found, domain_facts) = tokio::join!(
            self.robots_for(&page.final_url),
            self.not_found_for(&page.final_url),
            domain::probe(&page.final_url, &self.client, probe_timeout),
        );
        page_facts.domain = Some(domain_facts);

        let ctx = AnalysisContext::new(
            page.final_url.clone(),
            page.status.as_u16(),
            page.headers,
            page.stats,
            page.body,
            page_facts,
            robots,
            not_found,
            self.config.clone(),
            Arc::new(AssetProbeCache::new(self.client.clone())),
        );

        let (mut results, mut categories) = self.registry.run_all(&ctx).await;
        self.merge_rendering_results(&page.final_url, &mut results, &mut categories)
            .await;

        let score = score::compute(&results, &self.config.weights);
        tracing::info!("{} scored {:.2} ({} results)", page.final_url, score, results.len());

        Ok(AnalysisResult {
            url: page.final_url.to_string(),
            score,
            generated_at: Utc::now(),
            results,
            categories: CategoryIndex::from_run(categories),
        })
    }

    /// Robots probe for the page's host, cached per instance
    async fn robots_for(&self, url: &url::Url) -> Option<RobotsProbe> {
        let Some(host) = bare_host(url) else {
            return None;
        };

        let mut cache = self.robots_cache.lock().await;
        if let Some(cached) = cache.get(&host) {
            tracing::debug!("Using cached robots.txt probe for {}", host);
            return cached.clone();
        }

        let probed = probe_robots(&self.client, url, &self.config.request.user_agent).await;
        cache.insert(host, probed.clone());
        probed
    }

    /// Synthetic-404 probe for the page's host, cached per instance
    async fn not_found_for(&self, url: &url::Url) -> Option<NotFoundProbe> {
        let Some(host) = bare_host(url) else {
            return None;
        };

        let mut cache = self.not_found_cache.lock().await;
        if let Some(cached) = cache.get(&host) {
            tracing::debug!("Using cached 404 probe for {}", host);
            return cached.clone();
        }

        let probed = probe_not_found(&self.client, url).await;
        cache.insert(host, probed.clone());
        probed
    }

    /// Merges rendering-service output under additional check names,
    /// omitting whatever the service cannot deliver
    async fn merge_rendering_results(
        &self,
        url: &url::Url,
        results: &mut std::collections::BTreeMap<String, CheckResult>,
        categories: &mut Vec<(Category, Vec<String>)>,
    ) {
        let Some(service) = &self.rendering else {
            return;
        };

        let mut append = |category: Category, name: &str, value: serde_json::Value| {
            if results.contains_key(name) {
                tracing::warn!("Rendering result {} collides with a registered check", name);
                return;
            }
            results.insert(
                name.to_string(),
                CheckResult::pass(Importance::Low, value),
            );
            if let Some((_, names)) = categories.iter_mut().find(|(c, _)| *c == category) {
                names.push(name.to_string());
            } else {
                categories.push((category, vec![name.to_string()]));
            }
        };

        match service.core_web_vitals(url.as_str(), "mobile").await {
            Ok(value) => append(Category::Performance, "core_web_vitals", value),
            Err(e) => tracing::debug!("Rendering service vitals unavailable: {}", e),
        }

        match service.rendered_dom(url.as_str()).await {
            Ok(value) => append(Category::Miscellaneous, "rendered_dom", value),
            Err(e) => tracing::debug!("Rendering service DOM analysis unavailable: {}", e),
        }

        match service.screenshot(url.as_str(), "1280x720").await {
            Ok(value) => append(Category::Miscellaneous, "screenshot", value),
            Err(e) => tracing::debug!("Rendering service screenshot unavailable: {}", e),
        }
    }
}
