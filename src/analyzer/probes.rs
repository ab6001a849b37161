//! Ancillary probes: robots.txt and the synthetic-404 request
//!
//! Both probes return `Option` outcomes; `None` means the probe itself
//! failed (network error, timeout) and the corresponding fact is absent.
//! The orchestrator caches outcomes per host so repeated analyses on one
//! run reuse them.

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use robotstxt::DefaultMatcher;
use url::Url;

/// Outcome of the robots.txt probe for a host
#[derive(Debug, Clone)]
pub struct RobotsProbe {
    /// Whether a robots.txt file was served with a success status
    pub present: bool,

    /// The file body; empty when absent
    pub body: String,

    /// Whether the analyzed page is allowed for the configured user agent
    /// (an absent robots.txt allows everything)
    pub allows_page: bool,

    /// Sitemap URLs declared in the file
    pub sitemaps: Vec<String>,
}

/// Outcome of the synthetic-404 probe
#[derive(Debug, Clone)]
pub struct NotFoundProbe {
    /// The nonexistent path that was requested
    pub probed_path: String,

    /// Status the server answered with; a well-behaved site returns 404
    pub status: u16,
}

impl NotFoundProbe {
    pub fn returns_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Fetches and evaluates robots.txt for the page's host
pub async fn probe_robots(client: &Client, page_url: &Url, user_agent: &str) -> Option<RobotsProbe> {
    let robots_url = page_url.join("/robots.txt").ok()?;

    let response = match client.get(robots_url.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("robots.txt probe failed for {}: {}", robots_url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        return Some(RobotsProbe {
            present: false,
            body: String::new(),
            allows_page: true,
            sitemaps: Vec::new(),
        });
    }

    let body = response.text().await.ok()?;

    let mut matcher = DefaultMatcher::default();
    let allows_page = matcher.one_agent_allowed_by_robots(&body, user_agent, page_url.as_str());

    Some(RobotsProbe {
        present: true,
        allows_page,
        sitemaps: extract_sitemaps(&body),
        body,
    })
}

/// Requests a URL that cannot exist and records how the server answers
pub async fn probe_not_found(client: &Client, page_url: &Url) -> Option<NotFoundProbe> {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    let probed_path = format!("/{}", token);

    let probe_url = page_url.join(&probed_path).ok()?;

    match client.get(probe_url.clone()).send().await {
        Ok(response) => Some(NotFoundProbe {
            probed_path,
            status: response.status().as_u16(),
        }),
        Err(e) => {
            tracing::debug!("404 probe failed for {}: {}", probe_url, e);
            None
        }
    }
}

/// Collects `Sitemap:` directives from a robots.txt body
fn extract_sitemaps(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("sitemap") {
                let value = value.trim();
                (!value.is_empty()).then(|| value.to_string())
            } else {
                None
            }
        })
        .collect()
}
