//! Fact extraction: turning a fetched document into a normalized,
//! strongly typed fact record
//!
//! Each extractor is a stateless function over the parsed document tree,
//! the raw body, the final page URL, and the configuration. Extractors
//! never perform network I/O; the one exception is the domain extractor
//! ([`domain`]), which issues bounded DNS/TLS/well-known-file probes and
//! degrades every sub-fact to absent on failure.
//!
//! The merged [`PageFacts`] record is the single object every check
//! consumes. Every field a check reads has a defined default when absent:
//! optional facts are `Option`, counts are zero, lists are empty.

pub mod assets;
pub mod document;
pub mod domain;
pub mod head;
pub mod headings;
pub mod links;
pub mod media;
pub mod security;
pub mod structured;
pub mod technology;

pub use assets::{AssetFacts, AssetKind, AssetRef};
pub use document::DocumentFacts;
pub use domain::{DomainFacts, TlsCertificate};
pub use head::HeadFacts;
pub use headings::Heading;
pub use links::{Link, LinkFacts, LinkTarget};
pub use media::{Image, MediaFacts};
pub use security::SecurityFacts;
pub use structured::{StructuredBlock, StructuredDataFacts};
pub use technology::TechnologyFacts;

use crate::config::Config;
use scraper::Html;
use url::Url;

/// The complete fact record for one analyzed page
///
/// HTML-derived fragments are filled by [`extract_all`]; probe-derived
/// fragments (`domain`, plus the robots/404 outcomes held by the
/// orchestrator) start absent and are attached before the context is built.
#[derive(Debug, Clone, Default)]
pub struct PageFacts {
    pub document: DocumentFacts,
    pub head: HeadFacts,
    pub headings: Vec<Heading>,
    pub links: LinkFacts,
    pub media: MediaFacts,
    pub assets: AssetFacts,
    pub security: SecurityFacts,
    pub structured_data: StructuredDataFacts,
    pub technology: TechnologyFacts,

    /// Domain-level probe results; `None` when every probe failed or
    /// probing was skipped
    pub domain: Option<DomainFacts>,
}

/// Runs every HTML-derived extractor and merges the fragments
///
/// # Arguments
///
/// * `document` - The parsed (tolerant) document tree
/// * `raw_body` - The decoded response body, BOM already stripped
/// * `base_url` - The final page URL after redirects
/// * `config` - Analyzer configuration (thresholds feed a few extractors)
pub fn extract_all(document: &Html, raw_body: &str, base_url: &Url, config: &Config) -> PageFacts {
    PageFacts {
        document: document::extract(document, raw_body, config),
        head: head::extract(document, base_url),
        headings: headings::extract(document),
        links: links::extract(document, base_url),
        media: media::extract(document, base_url),
        assets: assets::extract(document, base_url),
        security: security::extract(document, base_url),
        structured_data: structured::extract(document),
        technology: technology::extract(document, raw_body),
        domain: None,
    }
}
