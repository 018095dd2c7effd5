//! Protocol parameters: every weighting constant, window and fee.
//!
//! Passed into the reputation ledger and lifecycle manager at construction;
//! nothing here is process-wide state.

use crate::Satoshis;
use serde::{Deserialize, Serialize};

/// All tunable protocol parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    pub reputation: ReputationParams,
    pub market: MarketParams,
}

/// Reputation ledger constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationParams {
    // ── Bounds and initial values ────────────────────────────────────────
    /// Score every verifier starts at and decays toward.
    pub base_reputation: f64,
    pub min_reputation: f64,
    pub max_reputation: f64,
    pub initial_accuracy: f64,

    // ── Outcome update ───────────────────────────────────────────────────
    /// Multiplier increment for a correct outcome (+5%).
    pub correct_reward: f64,
    /// Multiplier decrement for an incorrect outcome (-10%).
    pub incorrect_penalty: f64,
    /// Bonus when the claim category is in the verifier's expertise.
    pub expertise_bonus: f64,
    /// Bonus when stated confidence is within `calibration_tolerance` of accuracy.
    pub calibration_bonus: f64,
    pub calibration_tolerance: f64,

    // ── Decay ────────────────────────────────────────────────────────────
    /// Fraction of the distance to base reputation lost per inactive month.
    pub decay_rate: f64,

    // ── Gates and signals ────────────────────────────────────────────────
    /// Verifiers below this score must post an elevated stake.
    pub reputation_floor: f64,
    /// Suspicion assigned to every participant of a unanimous reveal set.
    pub unanimity_suspicion: f64,

    // ── Evidence quality ─────────────────────────────────────────────────
    pub evidence_base_score: f64,
    pub evidence_per_source_bonus: f64,
    pub evidence_diversity_cap: f64,
    pub evidence_credibility_weight: f64,
    /// Score for an empty evidence list: penalized, never zero.
    pub evidence_empty_score: f64,
}

impl Default for ReputationParams {
    fn default() -> Self {
        Self {
            base_reputation: 1.0,
            min_reputation: 0.1,
            max_reputation: 10.0,
            initial_accuracy: 0.5,

            correct_reward: 0.05,
            incorrect_penalty: 0.10,
            expertise_bonus: 1.2,
            calibration_bonus: 1.1,
            calibration_tolerance: 0.2,

            decay_rate: 0.05,

            reputation_floor: 1.0,
            unanimity_suspicion: 0.3,

            evidence_base_score: 0.5,
            evidence_per_source_bonus: 0.05,
            evidence_diversity_cap: 0.2,
            evidence_credibility_weight: 0.3,
            evidence_empty_score: 0.1,
        }
    }
}

/// Claim lifecycle, quorum and fee parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketParams {
    /// Minimum revealed verifications before consensus may be computed.
    pub min_quorum: u32,

    /// Duration of the commit phase in seconds.
    pub commit_window_secs: u64,

    /// Duration of the reveal phase in seconds.
    pub reveal_window_secs: u64,

    /// Time after consensus during which a dispute may be raised.
    pub dispute_window_secs: u64,

    /// Open the reveal phase early once this many commitments arrived (0 = never early).
    pub target_commitments: u32,

    /// Platform fee taken from the bounty before the reward split (basis points, 200 = 2%).
    pub platform_fee_bps: u32,

    pub min_bounty: Satoshis,
    pub min_stake: Satoshis,
}

impl MarketParams {
    /// Minimum lead time before the deadline for a claim to enter the commit phase.
    pub fn verification_window_secs(&self) -> u64 {
        self.commit_window_secs
            .saturating_add(self.reveal_window_secs)
    }

    pub fn platform_fee_rate(&self) -> f64 {
        f64::from(self.platform_fee_bps) / 10_000.0
    }
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            min_quorum: 3,
            commit_window_secs: 24 * 3600,  // 1 day
            reveal_window_secs: 24 * 3600,  // 1 day
            dispute_window_secs: 48 * 3600, // 2 days
            target_commitments: 0,
            platform_fee_bps: 200, // 2%
            min_bounty: Satoshis::new(1),
            min_stake: Satoshis::new(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_rate_from_bps() {
        let p = MarketParams::default();
        assert!((p.platform_fee_rate() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p: ProtocolParams =
            serde_json::from_str(r#"{"market":{"min_quorum":5}}"#).unwrap();
        assert_eq!(p.market.min_quorum, 5);
        assert_eq!(p.market.platform_fee_bps, 200);
        assert_eq!(p.reputation, ReputationParams::default());
    }
}
