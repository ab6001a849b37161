//! The check catalog: categories, the check trait, and the registry
//!
//! Checks are independent, side-effect-free strategies over the analysis
//! context. The registry is an explicit, constructed-once catalog (never
//! ambient global state) that validates result-name uniqueness at
//! construction; a duplicate name is a configuration error caught before
//! any network call.

pub mod misc;
pub mod performance;
pub mod result;
pub mod security;
pub mod seo;
pub mod technology;

pub use result::{CheckResult, Importance, NamedResult};

use crate::analyzer::AnalysisContext;
use crate::GaugeError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};

/// The five fixed check categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Seo,
    Performance,
    Security,
    Miscellaneous,
    Technology,
}

impl Category {
    /// All categories in their canonical report order
    pub fn all() -> [Category; 5] {
        [
            Category::Seo,
            Category::Performance,
            Category::Security,
            Category::Miscellaneous,
            Category::Technology,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Seo => "seo",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::Miscellaneous => "miscellaneous",
            Category::Technology => "technology",
        }
    }
}

/// One independent check
///
/// A check's only input is the context; it may emit zero, one, or several
/// named results. Execution order within a category is insertion order
/// but no check may rely on it.
#[async_trait]
pub trait Check: Send + Sync {
    /// Every result name this check can emit; used for startup
    /// uniqueness validation
    fn names(&self) -> &'static [&'static str];

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult>;
}

/// The constructed-once catalog of checks, grouped by category
pub struct CheckRegistry {
    categories: Vec<(Category, Vec<Box<dyn Check>>)>,
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field(
                "categories",
                &self
                    .categories
                    .iter()
                    .map(|(cat, checks)| (cat, checks.len()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CheckRegistry {
    /// Builds a registry from explicit parts, validating that every
    /// declared result name is globally unique
    pub fn from_parts(
        categories: Vec<(Category, Vec<Box<dyn Check>>)>,
    ) -> Result<Self, GaugeError> {
        let mut seen = HashSet::new();
        for (_, checks) in &categories {
            for check in checks {
                for name in check.names() {
                    if !seen.insert(*name) {
                        return Err(GaugeError::DuplicateCheck {
                            name: (*name).to_string(),
                        });
                    }
                }
            }
        }
        Ok(Self { categories })
    }

    /// The standard catalog shipped with the crate
    pub fn standard() -> Result<Self, GaugeError> {
        Self::from_parts(vec![
            (Category::Seo, seo::checks()),
            (Category::Performance, performance::checks()),
            (Category::Security, security::checks()),
            (Category::Miscellaneous, misc::checks()),
            (Category::Technology, technology::checks()),
        ])
    }

    /// Runs every check against the context
    ///
    /// Returns the merged result mapping plus, per category, the emitted
    /// result names in insertion order.
    pub async fn run_all(
        &self,
        ctx: &AnalysisContext,
    ) -> (BTreeMap<String, CheckResult>, Vec<(Category, Vec<String>)>) {
        let mut results = BTreeMap::new();
        let mut categories = Vec::with_capacity(self.categories.len());

        for (category, checks) in &self.categories {
            let mut emitted = Vec::new();
            for check in checks {
                for named in check.run(ctx).await {
                    tracing::trace!(
                        "check {} -> {}",
                        named.name,
                        if named.result.passed { "pass" } else { "fail" }
                    );
                    emitted.push(named.name.to_string());
                    results.insert(named.name.to_string(), named.result);
                }
            }
            categories.push((*category, emitted));
        }

        (results, categories)
    }

    /// Total number of registered checks
    pub fn check_count(&self) -> usize {
        self.categories.iter().map(|(_, c)| c.len()).sum()
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Context construction helpers shared by the check test modules

    use crate::analyzer::assets::AssetProbeCache;
    use crate::analyzer::fetch::RequestStats;
    use crate::analyzer::probes::{NotFoundProbe, RobotsProbe};
    use crate::analyzer::AnalysisContext;
    use crate::config::Config;
    use crate::facts::{self, DomainFacts};
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use reqwest::Client;
    use scraper::Html;
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    pub(crate) struct TestPage {
        pub html: String,
        pub url: String,
        pub headers: Vec<(&'static str, &'static str)>,
        pub config: Config,
        pub robots: Option<RobotsProbe>,
        pub not_found: Option<NotFoundProbe>,
        pub domain: Option<DomainFacts>,
        pub stats: RequestStats,
    }

    impl TestPage {
        pub(crate) fn new(html: &str) -> Self {
            Self {
                html: html.to_string(),
                url: "https://example.com/page".to_string(),
                headers: Vec::new(),
                config: Config::default(),
                robots: None,
                not_found: None,
                domain: None,
                stats: RequestStats {
                    download_size: html.len(),
                    total_time: Duration::from_millis(400),
                    ttfb: Duration::from_millis(60),
                },
            }
        }

        pub(crate) fn build(self) -> AnalysisContext {
            let url = Url::parse(&self.url).unwrap();
            let document = Html::parse_document(&self.html);
            let mut facts = facts::extract_all(&document, &self.html, &url, &self.config);
            facts.domain = self.domain;

            let mut headers = HeaderMap::new();
            for (name, value) in self.headers {
                headers.insert(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                );
            }

            AnalysisContext::new(
                url,
                200,
                headers,
                self.stats,
                self.html,
                facts,
                self.robots,
                self.not_found,
                self.config,
                Arc::new(AssetProbeCache::new(Client::new())),
            )
        }
    }
}
