//! Check result types
//!
//! A check returns one or more named results. The constructors enforce
//! the report contract: a failed result always carries at least one
//! error, a passed result never carries errors, and warnings may ride on
//! either.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How strongly a result contributes to the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// Outcome of one named check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,

    pub importance: Importance,

    /// Check-specific payload; its shape is part of each check's contract
    pub value: Value,

    /// Present and non-empty exactly when `passed` is false
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    /// May accompany passed and failed results alike
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CheckResult {
    /// A passing result
    pub fn pass(importance: Importance, value: Value) -> Self {
        Self {
            passed: true,
            importance,
            value,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A failing result; requires at least one error so the contract
    /// "failed implies non-empty errors" holds by construction
    pub fn fail(importance: Importance, value: Value, error: impl Into<String>) -> Self {
        Self {
            passed: false,
            importance,
            value,
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }

    /// Adds a further error to a failing result; ignored on a passing one
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        if !self.passed {
            self.errors.push(error.into());
        }
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Pass/fail on a condition, with symmetric value and a lazily built
    /// error message
    pub fn verdict(
        importance: Importance,
        value: Value,
        passed: bool,
        error: impl FnOnce() -> String,
    ) -> Self {
        if passed {
            Self::pass(importance, value)
        } else {
            Self::fail(importance, value, error())
        }
    }
}

/// A result tagged with its globally unique name
#[derive(Debug, Clone)]
pub struct NamedResult {
    pub name: &'static str,
    pub result: CheckResult,
}

impl NamedResult {
    pub fn new(name: &'static str, result: CheckResult) -> Self {
        Self { name, result }
    }
}
