//! HTTP client construction
//!
//! One client is built per analyzer and shared by the primary fetch, the
//! ancillary probes, and the asset HEAD cache, so connection pools and
//! proxy choice are consistent across a run.

use crate::config::RequestConfig;
use crate::GaugeError;
use rand::seq::SliceRandom;
use reqwest::{redirect::Policy, Client, Proxy};
use std::time::Duration;

/// Maximum redirect hops followed on any request
pub const REDIRECT_LIMIT: usize = 10;

/// Builds the shared HTTP client from the request configuration
///
/// Applies the configured user agent, timeout, and HTTP version pin;
/// enables gzip/deflate/brotli decompression; caps redirect chains at
/// [`REDIRECT_LIMIT`]; and, when proxies are configured, routes the whole
/// run through one chosen at random.
pub fn build_http_client(config: &RequestConfig) -> Result<Client, GaugeError> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
        .redirect(Policy::limited(REDIRECT_LIMIT))
        .gzip(true)
        .deflate(true)
        .brotli(true);

    builder = match config.http_version.as_str() {
        "1.1" => builder.http1_only(),
        "2" => builder.http2_prior_knowledge(),
        _ => builder,
    };

    if let Some(proxy_url) = choose_proxy(config) {
        tracing::debug!("Routing run through proxy {}", proxy_url);
        builder = builder.proxy(Proxy::all(proxy_url)?);
    }

    Ok(builder.build()?)
}

/// Picks one proxy at random from the configured newline-separated list
fn choose_proxy(config: &RequestConfig) -> Option<&str> {
    let proxies = config.proxy_list();
    proxies.choose(&mut rand::thread_rng()).copied()
}
