use serde::Deserialize;

/// Main configuration structure for sitegauge
///
/// Every section has full defaults so the analyzer is usable without a
/// config file; a TOML file overrides individual keys.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub sitemap: SitemapConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub weights: ScoreWeights,
}

/// HTTP request behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout", rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// HTTP protocol version: "auto", "1.1", or "2"
    #[serde(default = "default_http_version", rename = "http-version")]
    pub http_version: String,

    /// User-agent string sent with every request
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,

    /// Newline-separated proxy URLs; one is chosen at random per run
    #[serde(default)]
    pub proxies: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            http_version: default_http_version(),
            user_agent: default_user_agent(),
            proxies: String::new(),
        }
    }
}

impl RequestConfig {
    /// Returns the configured proxies as a list of non-empty lines
    pub fn proxy_list(&self) -> Vec<&str> {
        self.proxies
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Sitemap crawl configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SitemapConfig {
    /// Maximum number of pages analyzed per crawl; unlimited when absent
    #[serde(default, rename = "max-pages")]
    pub max_pages: Option<usize>,
}

/// Numeric and content thresholds consumed by the check catalog
#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_title_min", rename = "title-min-length")]
    pub title_min_length: usize,

    #[serde(default = "default_title_max", rename = "title-max-length")]
    pub title_max_length: usize,

    #[serde(default = "default_description_min", rename = "description-min-length")]
    pub description_min_length: usize,

    #[serde(default = "default_description_max", rename = "description-max-length")]
    pub description_max_length: usize,

    #[serde(default = "default_min_words", rename = "min-word-count")]
    pub min_word_count: usize,

    /// Minimum visible-text share of the raw body, in percent
    #[serde(default = "default_min_text_ratio", rename = "min-text-ratio")]
    pub min_text_ratio: f64,

    #[serde(default = "default_max_links", rename = "max-links")]
    pub max_links: usize,

    /// Maximum acceptable total load time, in seconds
    #[serde(default = "default_max_load_time", rename = "max-load-time")]
    pub max_load_time: f64,

    /// Maximum acceptable time to first byte, in seconds
    #[serde(default = "default_max_ttfb", rename = "max-ttfb")]
    pub max_ttfb: f64,

    /// Maximum acceptable page download size, in bytes
    #[serde(default = "default_max_page_size", rename = "max-page-size")]
    pub max_page_size: usize,

    #[serde(default = "default_max_requests", rename = "max-http-requests")]
    pub max_http_requests: usize,

    #[serde(default = "default_max_dom_nodes", rename = "max-dom-nodes")]
    pub max_dom_nodes: usize,

    /// Image formats considered modern (matched against extension or
    /// probed content-type)
    #[serde(default = "default_modern_formats", rename = "modern-image-formats")]
    pub modern_image_formats: Vec<String>,

    /// HTML tags considered deprecated
    #[serde(default = "default_deprecated_tags", rename = "deprecated-tags")]
    pub deprecated_tags: Vec<String>,

    /// Maximum acceptable size for any single image, in bytes
    #[serde(default = "default_max_image_bytes", rename = "max-image-bytes")]
    pub max_image_bytes: u64,

    /// Maximum acceptable size for the largest image on the page, in bytes
    #[serde(
        default = "default_max_largest_image_bytes",
        rename = "max-largest-image-bytes"
    )]
    pub max_largest_image_bytes: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_min_length: default_title_min(),
            title_max_length: default_title_max(),
            description_min_length: default_description_min(),
            description_max_length: default_description_max(),
            min_word_count: default_min_words(),
            min_text_ratio: default_min_text_ratio(),
            max_links: default_max_links(),
            max_load_time: default_max_load_time(),
            max_ttfb: default_max_ttfb(),
            max_page_size: default_max_page_size(),
            max_http_requests: default_max_requests(),
            max_dom_nodes: default_max_dom_nodes(),
            modern_image_formats: default_modern_formats(),
            deprecated_tags: default_deprecated_tags(),
            max_image_bytes: default_max_image_bytes(),
            max_largest_image_bytes: default_max_largest_image_bytes(),
        }
    }
}

/// Score weights per importance tier
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_high_weight")]
    pub high: u32,

    #[serde(default = "default_medium_weight")]
    pub medium: u32,

    #[serde(default = "default_low_weight")]
    pub low: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            high: default_high_weight(),
            medium: default_medium_weight(),
            low: default_low_weight(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_http_version() -> String {
    "auto".to_string()
}

fn default_user_agent() -> String {
    format!("sitegauge/{}", env!("CARGO_PKG_VERSION"))
}

fn default_title_min() -> usize {
    10
}

fn default_title_max() -> usize {
    70
}

fn default_description_min() -> usize {
    50
}

fn default_description_max() -> usize {
    160
}

fn default_min_words() -> usize {
    300
}

fn default_min_text_ratio() -> f64 {
    10.0
}

fn default_max_links() -> usize {
    150
}

fn default_max_load_time() -> f64 {
    3.0
}

fn default_max_ttfb() -> f64 {
    0.8
}

fn default_max_page_size() -> usize {
    3 * 1024 * 1024
}

fn default_max_requests() -> usize {
    60
}

fn default_max_dom_nodes() -> usize {
    1500
}

fn default_modern_formats() -> Vec<String> {
    vec!["webp".to_string(), "avif".to_string(), "svg".to_string()]
}

fn default_deprecated_tags() -> Vec<String> {
    ["center", "font", "marquee", "blink", "big", "strike", "tt", "frame", "frameset"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_image_bytes() -> u64 {
    500 * 1024
}

fn default_max_largest_image_bytes() -> u64 {
    1024 * 1024
}

fn default_high_weight() -> u32 {
    10
}

fn default_medium_weight() -> u32 {
    5
}

fn default_low_weight() -> u32 {
    0
}
