//! Reputation formulas.
//!
//! Pure functions of their inputs and [`ReputationParams`]; the ledger only
//! loads, applies and stores.

use truthmarket_types::{Evidence, ReputationParams};

/// Bayesian blend of the prior accuracy with one new observation.
///
/// The prior is weighted by the verifier's history length, but never less
/// than one observation.
pub fn updated_accuracy(prior_accuracy: f64, verification_count: u64, correct: bool) -> f64 {
    let prior_weight = verification_count.max(1) as f64;
    let observed = if correct { 1.0 } else { 0.0 };
    ((prior_accuracy * prior_weight + observed) / (prior_weight + 1.0)).clamp(0.0, 1.0)
}

/// Multiplier applied to the reputation score after one outcome.
pub fn outcome_multiplier(
    params: &ReputationParams,
    correct: bool,
    has_expertise: bool,
    confidence: f64,
    new_accuracy: f64,
) -> f64 {
    let base = if correct {
        1.0 + params.correct_reward
    } else {
        1.0 - params.incorrect_penalty
    };
    let expertise = if has_expertise {
        params.expertise_bonus
    } else {
        1.0
    };
    let calibration = if (confidence - new_accuracy).abs() < params.calibration_tolerance {
        params.calibration_bonus
    } else {
        1.0
    };
    base * expertise * calibration
}

pub fn clamp_score(params: &ReputationParams, score: f64) -> f64 {
    score.clamp(params.min_reputation, params.max_reputation)
}

/// Exponential pull toward the base reputation.
pub fn decayed_score(params: &ReputationParams, score: f64, inactive_months: u32) -> f64 {
    let months = i32::try_from(inactive_months).unwrap_or(i32::MAX);
    let factor = (1.0 - params.decay_rate).powi(months);
    clamp_score(
        params,
        params.base_reputation + (score - params.base_reputation) * factor,
    )
}

/// Quality of an evidence bundle in `[0, 1]`.
///
/// Base score, plus a capped bonus per source, plus the weighted mean
/// credibility (unrated items count as zero). An empty bundle scores the
/// configured floor.
pub fn evidence_quality_score(params: &ReputationParams, evidence: &[Evidence]) -> f64 {
    if evidence.is_empty() {
        return params.evidence_empty_score;
    }
    let n = evidence.len() as f64;
    let diversity = (n * params.evidence_per_source_bonus).min(params.evidence_diversity_cap);
    let mean_credibility = evidence
        .iter()
        .map(|e| e.credibility.unwrap_or(0.0).clamp(0.0, 1.0))
        .sum::<f64>()
        / n;
    (params.evidence_base_score + diversity + mean_credibility * params.evidence_credibility_weight)
        .min(1.0)
}
