//! Sitegauge: a weighted web page analysis engine
//!
//! This crate fetches a web page (or every same-domain page listed in a
//! sitemap), extracts a normalized fact record from its markup, headers, and
//! network behavior, evaluates a catalog of independent checks against those
//! facts, and produces a 0-100 score plus a structured JSON report.

pub mod analyzer;
pub mod checks;
pub mod config;
pub mod facts;
pub mod score;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for sitegauge operations
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Could not fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Could not fetch sitemap {url}: {message}")]
    Sitemap { url: String, message: String },

    #[error("Duplicate check name registered: {name}")]
    DuplicateCheck { name: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid proxy URL in config: {0}")]
    InvalidProxy(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for sitegauge operations
pub type Result<T> = std::result::Result<T, GaugeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyzer::{AnalysisContext, AnalysisResult, Analyzer};
pub use checks::{Category, CheckRegistry, CheckResult, Importance};
pub use config::Config;
pub use sitemap::SitemapCrawler;
pub use crate::url::{is_internal, normalize_input, resolve_url};
