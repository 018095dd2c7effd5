//! Reputation-weighted consensus over revealed verdicts.
//!
//! Unrevealed commitments are abstentions and never reach the tally.

use crate::error::ProtocolError;
use std::collections::BTreeMap;
use truthmarket_types::{
    Claim, ConsensusResult, MarketParams, ReputationParams, Timestamp, Verdict, Verification,
    Verifier, VerifierId,
};

#[derive(Clone, Debug)]
pub struct ConsensusAggregator {
    min_quorum: usize,
    expertise_bonus: f64,
}

impl ConsensusAggregator {
    pub fn new(market: &MarketParams, reputation: &ReputationParams) -> Self {
        Self {
            min_quorum: market.min_quorum as usize,
            expertise_bonus: reputation.expertise_bonus,
        }
    }

    pub fn min_quorum(&self) -> usize {
        self.min_quorum
    }

    /// Voting weight: current reputation times the expertise bonus.
    /// A verifier unknown to the ledger votes with weight 1.
    pub fn weight(&self, verifier: Option<&Verifier>, claim: &Claim) -> f64 {
        match verifier {
            Some(v) if v.has_expertise(claim.category) => v.reputation_score * self.expertise_bonus,
            Some(v) => v.reputation_score,
            None => 1.0,
        }
    }

    /// Tally `reveals` for `claim`.
    ///
    /// The winning verdict carries the most weight; equal weights resolve to
    /// the verdict with the lexicographically smallest canonical string.
    /// Deterministic for a given reveal set and verifier snapshot.
    pub fn calculate(
        &self,
        claim: &Claim,
        reveals: &[Verification],
        verifiers: &BTreeMap<VerifierId, Verifier>,
        now: Timestamp,
    ) -> Result<ConsensusResult, ProtocolError> {
        let insufficient = || ProtocolError::InsufficientQuorum {
            claim: claim.id.clone(),
            have: reveals.len(),
            need: self.min_quorum,
        };
        if reveals.len() < self.min_quorum {
            return Err(insufficient());
        }

        let mut tally: BTreeMap<Verdict, f64> = BTreeMap::new();
        for reveal in reveals {
            let w = self.weight(verifiers.get(&reveal.verifier), claim);
            *tally.entry(reveal.verdict).or_insert(0.0) += w;
        }
        let total: f64 = tally.values().sum();
        if total <= 0.0 {
            return Err(insufficient());
        }

        // BTreeMap iterates in canonical-string order, so a strict `>` keeps
        // the smallest verdict on ties.
        let mut winner: Option<(Verdict, f64)> = None;
        for (verdict, weight) in &tally {
            if winner.map_or(true, |(_, best)| *weight > best) {
                winner = Some((*verdict, *weight));
            }
        }
        let (verdict, winning_weight) = winner.ok_or_else(insufficient)?;

        let mut participants: Vec<VerifierId> =
            reveals.iter().map(|r| r.verifier.clone()).collect();
        participants.sort();

        Ok(ConsensusResult {
            claim_id: claim.id.clone(),
            verdict,
            confidence: (winning_weight / total).clamp(0.0, 1.0),
            participating_verifiers: participants,
            is_final: false,
            computed_at: now,
            finalized_at: None,
        })
    }
}
