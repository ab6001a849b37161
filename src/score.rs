//! The scorer: reduces all check results to a single 0-100 score

use crate::checks::{CheckResult, Importance};
use crate::config::ScoreWeights;
use std::collections::BTreeMap;

/// Computes the weighted score over every check result
///
/// Each result contributes its importance weight to the total; passing
/// results also contribute it to the earned sum. The score is
/// `100 * earned / total`, rounded to two decimals.
///
/// When the total weight is zero the score is 0, not undefined: under
/// default weights a report consisting solely of low-importance results
/// scores 0 even if every check passed. That edge is part of the scoring
/// contract and is pinned by tests.
pub fn compute(results: &BTreeMap<String, CheckResult>, weights: &ScoreWeights) -> f64 {
    let mut total = 0u64;
    let mut earned = 0u64;

    for result in results.values() {
        let weight = weight_of(result.importance, weights) as u64;
        total += weight;
        if result.passed {
            earned += weight;
        }
    }

    if total == 0 {
        return 0.0;
    }

    let score = 100.0 * earned as f64 / total as f64;
    (score * 100.0).round() / 100.0
}

fn weight_of(importance: Importance, weights: &ScoreWeights) -> u32 {
    match importance {
        Importance::High => weights.high,
        Importance::Medium => weights.medium,
        Importance::Low => weights.low,
    }
}
