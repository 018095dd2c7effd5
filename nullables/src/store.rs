//! Fault-injecting store: a [`MemoryStore`] whose writes can be made to fail.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use truthmarket_store::{
    ClaimStore, ConsensusStore, MemoryStore, StoreError, VerificationStore, VerifierStore,
};
use truthmarket_types::{
    Claim, ClaimId, ClaimStatus, Commitment, ConsensusResult, Digest, Dispute, PayoutRecord,
    Timestamp, Verification, Verifier, VerifierId,
};

/// Store operations that can be armed to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StoreOp {
    UpdateClaimStatus,
    ListVerifications,
    FinalizeConsensus,
    ReservePayout,
    SettlePayout,
    ReleasePayout,
    ApplyOutcome,
}

/// Delegates to an inner [`MemoryStore`]. An armed operation fails with
/// `StoreError::Backend` without touching the inner store, once per arming.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    armed: Mutex<BTreeMap<StoreOp, u32>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `times` calls of `op`.
    pub fn fail_next(&self, op: StoreOp, times: u32) {
        *self.armed().entry(op).or_default() += times;
    }

    /// Failures still armed for `op`.
    pub fn pending_failures(&self, op: StoreOp) -> u32 {
        self.armed().get(&op).copied().unwrap_or(0)
    }

    fn trip(&self, op: StoreOp) -> Result<(), StoreError> {
        let mut armed = self.armed();
        match armed.get_mut(&op) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Err(StoreError::Backend(format!("injected {op:?} failure")))
            }
            _ => Ok(()),
        }
    }

    fn armed(&self) -> MutexGuard<'_, BTreeMap<StoreOp, u32>> {
        self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ClaimStore for FlakyStore {
    fn insert_claim(&self, claim: &Claim) -> Result<(), StoreError> {
        self.inner.insert_claim(claim)
    }

    fn get_claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError> {
        self.inner.get_claim(id)
    }

    fn find_claim_by_hash(&self, canonical_hash: &Digest) -> Result<Option<Claim>, StoreError> {
        self.inner.find_claim_by_hash(canonical_hash)
    }

    fn update_claim_status(
        &self,
        id: &ClaimId,
        expected: ClaimStatus,
        next: ClaimStatus,
        at: Timestamp,
    ) -> Result<Claim, StoreError> {
        self.trip(StoreOp::UpdateClaimStatus)?;
        self.inner.update_claim_status(id, expected, next, at)
    }

    fn list_claims_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, StoreError> {
        self.inner.list_claims_by_status(status)
    }
}

impl VerificationStore for FlakyStore {
    fn insert_commitment(&self, commitment: &Commitment) -> Result<(), StoreError> {
        self.inner.insert_commitment(commitment)
    }

    fn get_commitment(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<Commitment>, StoreError> {
        self.inner.get_commitment(claim, verifier)
    }

    fn list_commitments(&self, claim: &ClaimId) -> Result<Vec<Commitment>, StoreError> {
        self.inner.list_commitments(claim)
    }

    fn insert_verification(&self, verification: &Verification) -> Result<(), StoreError> {
        self.inner.insert_verification(verification)
    }

    fn get_verification(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<Verification>, StoreError> {
        self.inner.get_verification(claim, verifier)
    }

    fn list_verifications(&self, claim: &ClaimId) -> Result<Vec<Verification>, StoreError> {
        self.trip(StoreOp::ListVerifications)?;
        self.inner.list_verifications(claim)
    }
}

impl ConsensusStore for FlakyStore {
    fn save_consensus_result(&self, result: &ConsensusResult) -> Result<(), StoreError> {
        self.inner.save_consensus_result(result)
    }

    fn get_consensus_result(&self, claim: &ClaimId) -> Result<Option<ConsensusResult>, StoreError> {
        self.inner.get_consensus_result(claim)
    }

    fn finalize_consensus_result(&self, claim: &ClaimId, at: Timestamp) -> Result<bool, StoreError> {
        self.trip(StoreOp::FinalizeConsensus)?;
        self.inner.finalize_consensus_result(claim, at)
    }

    fn insert_dispute(&self, dispute: &Dispute) -> Result<(), StoreError> {
        self.inner.insert_dispute(dispute)
    }

    fn get_dispute(&self, claim: &ClaimId) -> Result<Option<Dispute>, StoreError> {
        self.inner.get_dispute(claim)
    }

    fn reserve_payout(&self, payout: &PayoutRecord) -> Result<(), StoreError> {
        self.trip(StoreOp::ReservePayout)?;
        self.inner.reserve_payout(payout)
    }

    fn settle_payout(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
        settlement_ref: &str,
        at: Timestamp,
    ) -> Result<PayoutRecord, StoreError> {
        self.trip(StoreOp::SettlePayout)?;
        self.inner.settle_payout(claim, verifier, settlement_ref, at)
    }

    fn release_payout(&self, claim: &ClaimId, verifier: &VerifierId) -> Result<(), StoreError> {
        self.trip(StoreOp::ReleasePayout)?;
        self.inner.release_payout(claim, verifier)
    }

    fn get_payout(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<PayoutRecord>, StoreError> {
        self.inner.get_payout(claim, verifier)
    }

    fn list_payouts(&self, claim: &ClaimId) -> Result<Vec<PayoutRecord>, StoreError> {
        self.inner.list_payouts(claim)
    }
}

impl VerifierStore for FlakyStore {
    fn get_verifier(&self, id: &VerifierId) -> Result<Option<Verifier>, StoreError> {
        self.inner.get_verifier(id)
    }

    fn put_verifier(&self, verifier: &Verifier) -> Result<(), StoreError> {
        self.inner.put_verifier(verifier)
    }

    fn list_verifiers(&self) -> Result<Vec<Verifier>, StoreError> {
        self.inner.list_verifiers()
    }

    fn apply_outcome(&self, verifier: &Verifier, claim: &ClaimId) -> Result<(), StoreError> {
        self.trip(StoreOp::ApplyOutcome)?;
        self.inner.apply_outcome(verifier, claim)
    }

    fn outcome_applied(&self, claim: &ClaimId, verifier: &VerifierId) -> Result<bool, StoreError> {
        self.inner.outcome_applied(claim, verifier)
    }
}
