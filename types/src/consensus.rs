//! Consensus, dispute and payout records.

use crate::{ClaimId, Satoshis, Timestamp, Verdict, VerifierId};
use serde::{Deserialize, Serialize};

/// The reputation-weighted aggregate verdict for a claim.
///
/// `is_final` flips exactly once, after the dispute window; the record is
/// immutable from then on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub claim_id: ClaimId,
    pub verdict: Verdict,
    /// Winning weight over total weight, in `[0, 1]`.
    pub confidence: f64,
    pub participating_verifiers: Vec<VerifierId>,
    pub is_final: bool,
    pub computed_at: Timestamp,
    pub finalized_at: Option<Timestamp>,
}

/// A challenge raised against a consensus result inside the dispute window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub claim_id: ClaimId,
    pub challenger: VerifierId,
    pub bond: Satoshis,
    pub reason: String,
    pub raised_at: Timestamp,
}

/// Settlement state of a payout record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayoutState {
    /// Reserved before the settlement call; the transfer may or may not have happened.
    Pending,
    /// The settlement provider confirmed the transfer.
    Settled,
}

/// One reward. At most one per `(claim, verifier)`.
///
/// The record is reserved as `Pending` before funds move and marked
/// `Settled` with the provider's reference afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub claim_id: ClaimId,
    pub verifier: VerifierId,
    pub amount: Satoshis,
    pub state: PayoutState,
    pub settlement_ref: Option<String>,
    pub reserved_at: Timestamp,
    pub paid_at: Option<Timestamp>,
}

impl PayoutRecord {
    pub fn pending(claim_id: ClaimId, verifier: VerifierId, amount: Satoshis, at: Timestamp) -> Self {
        Self {
            claim_id,
            verifier,
            amount,
            state: PayoutState::Pending,
            settlement_ref: None,
            reserved_at: at,
            paid_at: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state == PayoutState::Settled
    }
}
