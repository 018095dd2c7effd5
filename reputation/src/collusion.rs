//! Collusion signals over a claim's reveal set.
//!
//! Each detector returns a suspicion score per verifier; scores from all
//! detectors are summed. Detectors only flag, they never change reputation.

use std::collections::BTreeMap;
use truthmarket_types::{ClaimId, Verification, VerifierId};

pub type SuspicionScores = BTreeMap<VerifierId, f64>;

pub trait CollusionDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, claim: &ClaimId, reveals: &[Verification]) -> SuspicionScores;
}

/// Flags every participant when all revealed verdicts are identical.
#[derive(Clone, Debug)]
pub struct UnanimityDetector {
    pub suspicion: f64,
}

impl UnanimityDetector {
    pub fn new(suspicion: f64) -> Self {
        Self { suspicion }
    }
}

impl CollusionDetector for UnanimityDetector {
    fn name(&self) -> &'static str {
        "unanimity"
    }

    fn detect(&self, _claim: &ClaimId, reveals: &[Verification]) -> SuspicionScores {
        let Some(first) = reveals.first() else {
            return SuspicionScores::new();
        };
        if reveals.iter().any(|r| r.verdict != first.verdict) {
            return SuspicionScores::new();
        }
        reveals
            .iter()
            .map(|r| (r.verifier.clone(), self.suspicion))
            .collect()
    }
}

/// Run every detector and sum the scores per verifier.
pub fn combined_suspicion(
    detectors: &[Box<dyn CollusionDetector>],
    claim: &ClaimId,
    reveals: &[Verification],
) -> SuspicionScores {
    let mut total = SuspicionScores::new();
    for detector in detectors {
        for (verifier, score) in detector.detect(claim, reveals) {
            *total.entry(verifier).or_insert(0.0) += score;
        }
    }
    total
}
