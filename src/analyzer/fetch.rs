//! Primary page fetch
//!
//! Issues the main GET request, classifies failures into the typed fatal
//! errors of the crate, and captures everything later stages need: final
//! URL, status, headers, decoded body (BOM stripped), and timing/size
//! statistics.

use crate::{GaugeError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use url::Url;

/// Timing and size statistics for the primary request
#[derive(Debug, Clone, Copy)]
pub struct RequestStats {
    /// Decoded body size in bytes
    pub download_size: usize,

    /// Wall time from request start to full body received
    pub total_time: Duration,

    /// Wall time from request start to response headers received
    pub ttfb: Duration,
}

/// Everything captured from the primary GET
#[derive(Debug)]
pub struct FetchedPage {
    /// The URL as requested, after input normalization
    pub requested_url: Url,

    /// The URL after the redirect chain settled
    pub final_url: Url,

    pub status: StatusCode,

    pub headers: HeaderMap,

    /// Decoded body with any leading byte-order mark stripped
    pub body: String,

    pub stats: RequestStats,
}

/// Fetches the primary page
///
/// Failure here is fatal for the page's analysis: timeouts, connection
/// errors, redirect-cap overruns, and non-2xx terminal statuses all map
/// to typed errors. Transfer decoding (gzip/deflate/br) is handled by the
/// HTTP layer.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    let start = Instant::now();

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let ttfb = start.elapsed();

    let final_url = response.url().clone();
    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        return Err(GaugeError::HttpStatus {
            url: final_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;
    let total_time = start.elapsed();

    let body = strip_bom(&body).to_string();

    tracing::debug!(
        "Fetched {} ({} bytes, {:.0} ms, TTFB {:.0} ms)",
        final_url,
        body.len(),
        total_time.as_secs_f64() * 1000.0,
        ttfb.as_secs_f64() * 1000.0
    );

    Ok(FetchedPage {
        requested_url: url.clone(),
        final_url,
        status,
        headers,
        stats: RequestStats {
            download_size: body.len(),
            total_time,
            ttfb,
        },
        body,
    })
}

/// Maps a reqwest error onto the crate's fatal error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> GaugeError {
    if error.is_timeout() {
        GaugeError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        GaugeError::RedirectLimit {
            url: url.to_string(),
        }
    } else {
        GaugeError::Fetch {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Strips a leading byte-order mark before HTML parsing
fn strip_bom(body: &str) -> &str {
    body.strip_prefix('\u{feff}').unwrap_or(body)
}
