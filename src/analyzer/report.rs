//! The analysis report
//!
//! Assembled once after every check has run; immutable thereafter; the
//! JSON shape is a stable contract for downstream consumers.

use crate::checks::{Category, CheckResult};
use crate::{GaugeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category listing of emitted check names, in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryIndex {
    pub seo: Vec<String>,
    pub performance: Vec<String>,
    pub security: Vec<String>,
    pub miscellaneous: Vec<String>,
    pub technology: Vec<String>,
}

impl CategoryIndex {
    /// Builds the index from the registry's run output
    pub fn from_run(categories: Vec<(Category, Vec<String>)>) -> Self {
        let mut index = CategoryIndex::default();
        for (category, names) in categories {
            match category {
                Category::Seo => index.seo = names,
                Category::Performance => index.performance = names,
                Category::Security => index.security = names,
                Category::Miscellaneous => index.miscellaneous = names,
                Category::Technology => index.technology = names,
            }
        }
        index
    }
}

/// The complete result of one page analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The final page URL after redirects
    pub url: String,

    /// Weighted score, 0 to 100
    pub score: f64,

    /// When the analysis finished (serialized as ISO-8601)
    pub generated_at: DateTime<Utc>,

    /// Every named check result
    pub results: BTreeMap<String, CheckResult>,

    /// Check names per category, in execution order
    pub categories: CategoryIndex,
}

impl AnalysisResult {
    /// Serializes the report to its canonical JSON form
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GaugeError::Io(e.into()))
    }

    /// Serializes the report as human-readable JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GaugeError::Io(e.into()))
    }
}
