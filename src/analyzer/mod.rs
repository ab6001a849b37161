//! The fetch orchestrator and its collaborators
//!
//! This module drives one page analysis end-to-end: primary GET, tolerant
//! parsing, fact extraction, ancillary probes, context assembly, check
//! execution, scoring, and report assembly.

pub mod assets;
pub mod client;
pub mod context;
pub mod fetch;
pub mod orchestrator;
pub mod probes;
pub mod render;
pub mod report;

pub use assets::{AssetProbe, AssetProbeCache};
pub use client::build_http_client;
pub use context::AnalysisContext;
pub use fetch::{fetch_page, FetchedPage, RequestStats};
pub use orchestrator::Analyzer;
pub use probes::{NotFoundProbe, RobotsProbe};
pub use render::RenderingService;
pub use report::AnalysisResult;
