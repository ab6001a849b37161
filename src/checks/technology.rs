//! Technology checks: informational fingerprints of the stack serving
//! the page
//!
//! These results are informational: they pass and carry the detected
//! values, warning when a generator tag discloses a version number.

use crate::analyzer::AnalysisContext;
use crate::checks::{Check, CheckResult, Importance, NamedResult};
use async_trait::async_trait;
use serde_json::json;

/// The technology category in insertion order
pub fn checks() -> Vec<Box<dyn Check>> {
    vec![Box::new(GeneratorCheck), Box::new(DetectedTechnologiesCheck)]
}

/// The generator meta tag, with a version-disclosure warning
struct GeneratorCheck;

#[async_trait]
impl Check for GeneratorCheck {
    fn names(&self) -> &'static [&'static str] {
        &["generator"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let generator = ctx.facts().technology.generator.as_deref();

        let mut result = CheckResult::pass(Importance::Low, json!(generator));
        if let Some(value) = generator {
            if value.chars().any(|c| c.is_ascii_digit()) {
                result = result
                    .with_warning(format!("Generator tag discloses a version: {}", value));
            }
        }

        vec![NamedResult::new("generator", result)]
    }
}

/// Technologies recognized from markup signatures and response headers
struct DetectedTechnologiesCheck;

#[async_trait]
impl Check for DetectedTechnologiesCheck {
    fn names(&self) -> &'static [&'static str] {
        &["detected_technologies"]
    }

    async fn run(&self, ctx: &AnalysisContext) -> Vec<NamedResult> {
        let mut detected = ctx.facts().technology.detected.clone();

        // Header fingerprints complement the markup signatures
        if let Some(powered_by) = ctx.header("x-powered-by") {
            let name = powered_by.split('/').next().unwrap_or(powered_by).trim();
            if !name.is_empty() && !detected.iter().any(|d| d.eq_ignore_ascii_case(name)) {
                detected.push(name.to_string());
            }
        }

        let result = CheckResult::pass(Importance::Low, json!(detected));

        vec![NamedResult::new("detected_technologies", result)]
    }
}
