//! Optional rendering-service seam
//!
//! A headless-browser/Lighthouse collaborator can be attached to the
//! analyzer. It is consumed through three opaque JSON-returning
//! operations; when the service is absent or an operation fails, the
//! corresponding results are simply omitted from the report.

use async_trait::async_trait;
use serde_json::Value;

/// Result of one rendering-service operation; the error is opaque
pub type RenderResult = std::result::Result<Value, String>;

/// An external rendering/auditing service
#[async_trait]
pub trait RenderingService: Send + Sync {
    /// Core web vitals for a URL on a device class ("mobile"/"desktop")
    async fn core_web_vitals(&self, url: &str, device: &str) -> RenderResult;

    /// Post-JavaScript rendered-DOM analysis for a URL
    async fn rendered_dom(&self, url: &str) -> RenderResult;

    /// Screenshot capture for a URL at a viewport ("1280x720")
    async fn screenshot(&self, url: &str, viewport: &str) -> RenderResult;
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// A canned service for orchestrator tests
    pub(crate) struct StaticRenderingService {
        pub vitals: RenderResult,
        pub dom: RenderResult,
        pub shot: RenderResult,
    }

    #[async_trait]
    impl RenderingService for StaticRenderingService {
        async fn core_web_vitals(&self, _url: &str, _device: &str) -> RenderResult {
            self.vitals.clone()
        }

        async fn rendered_dom(&self, _url: &str) -> RenderResult {
            self.dom.clone()
        }

        async fn screenshot(&self, _url: &str, _viewport: &str) -> RenderResult {
            self.shot.clone()
        }
    }
}
