//! Per-run asset probe cache
//!
//! Several checks need the response headers of referenced assets
//! (cache-control coverage, image weight, redirect chains). The cache
//! issues at most one HEAD request per unique URL per analysis run;
//! concurrent first requests for the same URL are coalesced so only one
//! is on the wire.

use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use url::Url;

/// Outcome of a HEAD probe against one asset URL
#[derive(Debug, Clone)]
pub struct AssetProbe {
    pub status: u16,

    pub headers: HeaderMap,

    /// URL after any redirect chain
    pub final_url: String,

    /// Content-Length header, when the server sent one
    pub content_length: Option<u64>,
}

impl AssetProbe {
    /// Returns a response header as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the asset was served with any caching directive
    pub fn has_cache_headers(&self) -> bool {
        self.headers.contains_key("cache-control") || self.headers.contains_key("expires")
    }
}

type ProbeCell = Arc<OnceCell<Option<AssetProbe>>>;

/// Lazily populated, coalescing HEAD-probe cache for one analysis run
pub struct AssetProbeCache {
    client: Client,
    entries: Mutex<HashMap<String, ProbeCell>>,
}

impl AssetProbeCache {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Probes an asset URL, reusing the cached outcome when present
    ///
    /// The first caller for a URL issues the HEAD request; concurrent
    /// callers for the same URL wait on the same in-flight request rather
    /// than issuing their own. `data:` URIs and non-HTTP(S) schemes are
    /// never probed and yield `None` immediately. `None` also records a
    /// failed probe, which is a first-class state for the checks.
    pub async fn probe(&self, url: &str) -> Option<AssetProbe> {
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            _ => return None,
        }

        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(url.to_string()).or_default().clone()
        };

        cell.get_or_init(|| self.issue_head(url.to_string()))
            .await
            .clone()
    }

    async fn issue_head(&self, url: String) -> Option<AssetProbe> {
        tracing::debug!("HEAD probe {}", url);

        match self.client.head(&url).send().await {
            Ok(response) => Some(AssetProbe {
                status: response.status().as_u16(),
                content_length: response.content_length(),
                final_url: response.url().to_string(),
                headers: response.headers().clone(),
            }),
            Err(e) => {
                tracing::debug!("HEAD probe failed for {}: {}", url, e);
                None
            }
        }
    }

    /// Number of distinct URLs probed (or in flight) so far
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
