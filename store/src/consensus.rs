//! Consensus, dispute and payout storage trait.

use crate::StoreError;
use truthmarket_types::{ClaimId, ConsensusResult, Dispute, PayoutRecord, Timestamp, VerifierId};

pub trait ConsensusStore {
    /// Insert or replace the consensus result for a claim.
    /// Fails with `Conflict` once the stored result is final.
    fn save_consensus_result(&self, result: &ConsensusResult) -> Result<(), StoreError>;

    fn get_consensus_result(&self, claim: &ClaimId) -> Result<Option<ConsensusResult>, StoreError>;

    /// Flip `is_final` from false to true.
    ///
    /// Returns `Ok(true)` for the single call that performed the flip and
    /// `Ok(false)` if the result was already final.
    fn finalize_consensus_result(&self, claim: &ClaimId, at: Timestamp) -> Result<bool, StoreError>;

    /// Record a dispute. One per claim.
    fn insert_dispute(&self, dispute: &Dispute) -> Result<(), StoreError>;

    fn get_dispute(&self, claim: &ClaimId) -> Result<Option<Dispute>, StoreError>;

    /// Reserve a payout before any funds move. Fails with `Duplicate` if a
    /// record of any state already exists for the `(claim, verifier)`.
    fn reserve_payout(&self, payout: &PayoutRecord) -> Result<(), StoreError>;

    /// Mark a reserved payout settled with the provider's reference.
    /// `NotFound` without a reservation, `Conflict` if already settled.
    fn settle_payout(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
        settlement_ref: &str,
        at: Timestamp,
    ) -> Result<PayoutRecord, StoreError>;

    /// Drop a pending reservation after the provider refused the transfer.
    /// `Conflict` if the payout is already settled; a missing record is a no-op.
    fn release_payout(&self, claim: &ClaimId, verifier: &VerifierId) -> Result<(), StoreError>;

    fn get_payout(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<PayoutRecord>, StoreError>;

    fn list_payouts(&self, claim: &ClaimId) -> Result<Vec<PayoutRecord>, StoreError>;
}
