//! In-memory store: thread-safe, process-local, non-durable.

use crate::{ClaimStore, ConsensusStore, StoreError, VerificationStore, VerifierStore};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use truthmarket_types::{
    Claim, ClaimId, ClaimStatus, Commitment, ConsensusResult, Digest, Dispute, PayoutRecord,
    PayoutState, Timestamp, Verification, Verifier, VerifierId,
};

type VoteKey = (ClaimId, VerifierId);

#[derive(Default)]
struct Tables {
    claims: BTreeMap<ClaimId, Claim>,
    claims_by_hash: BTreeMap<Digest, ClaimId>,
    commitments: BTreeMap<VoteKey, Commitment>,
    verifications: BTreeMap<VoteKey, Verification>,
    consensus: BTreeMap<ClaimId, ConsensusResult>,
    disputes: BTreeMap<ClaimId, Dispute>,
    payouts: BTreeMap<VoteKey, PayoutRecord>,
    verifiers: BTreeMap<VerifierId, Verifier>,
    outcomes: BTreeSet<VoteKey>,
}

/// All tables sit behind one mutex, so every trait method is atomic with
/// respect to every other.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn vote_key(claim: &ClaimId, verifier: &VerifierId) -> VoteKey {
    (claim.clone(), verifier.clone())
}

fn scoped<T: Clone>(map: &BTreeMap<VoteKey, T>, claim: &ClaimId) -> Vec<T> {
    map.iter()
        .filter(|((c, _), _)| c == claim)
        .map(|(_, v)| v.clone())
        .collect()
}

impl ClaimStore for MemoryStore {
    fn insert_claim(&self, claim: &Claim) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.claims.contains_key(&claim.id) {
            return Err(StoreError::Duplicate(format!("claim {}", claim.id)));
        }
        if let Some(existing) = t.claims_by_hash.get(&claim.canonical_hash) {
            return Err(StoreError::Duplicate(format!(
                "canonical hash {} (claim {existing})",
                claim.canonical_hash
            )));
        }
        t.claims_by_hash
            .insert(claim.canonical_hash, claim.id.clone());
        t.claims.insert(claim.id.clone(), claim.clone());
        Ok(())
    }

    fn get_claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError> {
        Ok(self.tables().claims.get(id).cloned())
    }

    fn find_claim_by_hash(&self, canonical_hash: &Digest) -> Result<Option<Claim>, StoreError> {
        let t = self.tables();
        Ok(t.claims_by_hash
            .get(canonical_hash)
            .and_then(|id| t.claims.get(id))
            .cloned())
    }

    fn update_claim_status(
        &self,
        id: &ClaimId,
        expected: ClaimStatus,
        next: ClaimStatus,
        at: Timestamp,
    ) -> Result<Claim, StoreError> {
        let mut t = self.tables();
        let claim = t
            .claims
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("claim {id}")))?;
        if claim.status != expected {
            return Err(StoreError::Conflict(format!(
                "claim {id} is {}, expected {}",
                claim.status.as_str(),
                expected.as_str()
            )));
        }
        claim.status = next;
        claim.updated_at = at;
        Ok(claim.clone())
    }

    fn list_claims_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, StoreError> {
        Ok(self
            .tables()
            .claims
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect())
    }
}

impl VerificationStore for MemoryStore {
    fn insert_commitment(&self, commitment: &Commitment) -> Result<(), StoreError> {
        let key = vote_key(&commitment.claim_id, &commitment.verifier);
        let mut t = self.tables();
        if t.commitments.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "commitment {}/{}",
                key.0, key.1
            )));
        }
        t.commitments.insert(key, commitment.clone());
        Ok(())
    }

    fn get_commitment(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<Commitment>, StoreError> {
        Ok(self
            .tables()
            .commitments
            .get(&vote_key(claim, verifier))
            .cloned())
    }

    fn list_commitments(&self, claim: &ClaimId) -> Result<Vec<Commitment>, StoreError> {
        Ok(scoped(&self.tables().commitments, claim))
    }

    fn insert_verification(&self, verification: &Verification) -> Result<(), StoreError> {
        let key = vote_key(&verification.claim_id, &verification.verifier);
        let mut t = self.tables();
        if t.verifications.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "verification {}/{}",
                key.0, key.1
            )));
        }
        t.verifications.insert(key, verification.clone());
        Ok(())
    }

    fn get_verification(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<Verification>, StoreError> {
        Ok(self
            .tables()
            .verifications
            .get(&vote_key(claim, verifier))
            .cloned())
    }

    fn list_verifications(&self, claim: &ClaimId) -> Result<Vec<Verification>, StoreError> {
        Ok(scoped(&self.tables().verifications, claim))
    }
}

impl ConsensusStore for MemoryStore {
    fn save_consensus_result(&self, result: &ConsensusResult) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.consensus
            .get(&result.claim_id)
            .is_some_and(|existing| existing.is_final)
        {
            return Err(StoreError::Conflict(format!(
                "consensus for {} is final",
                result.claim_id
            )));
        }
        t.consensus.insert(result.claim_id.clone(), result.clone());
        Ok(())
    }

    fn get_consensus_result(&self, claim: &ClaimId) -> Result<Option<ConsensusResult>, StoreError> {
        Ok(self.tables().consensus.get(claim).cloned())
    }

    fn finalize_consensus_result(&self, claim: &ClaimId, at: Timestamp) -> Result<bool, StoreError> {
        let mut t = self.tables();
        let result = t
            .consensus
            .get_mut(claim)
            .ok_or_else(|| StoreError::NotFound(format!("consensus for {claim}")))?;
        if result.is_final {
            return Ok(false);
        }
        result.is_final = true;
        result.finalized_at = Some(at);
        Ok(true)
    }

    fn insert_dispute(&self, dispute: &Dispute) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.disputes.contains_key(&dispute.claim_id) {
            return Err(StoreError::Duplicate(format!(
                "dispute for {}",
                dispute.claim_id
            )));
        }
        t.disputes.insert(dispute.claim_id.clone(), dispute.clone());
        Ok(())
    }

    fn get_dispute(&self, claim: &ClaimId) -> Result<Option<Dispute>, StoreError> {
        Ok(self.tables().disputes.get(claim).cloned())
    }

    fn reserve_payout(&self, payout: &PayoutRecord) -> Result<(), StoreError> {
        let key = vote_key(&payout.claim_id, &payout.verifier);
        let mut t = self.tables();
        if t.payouts.contains_key(&key) {
            return Err(StoreError::Duplicate(format!("payout {}/{}", key.0, key.1)));
        }
        t.payouts.insert(key, payout.clone());
        Ok(())
    }

    fn settle_payout(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
        settlement_ref: &str,
        at: Timestamp,
    ) -> Result<PayoutRecord, StoreError> {
        let mut t = self.tables();
        let record = t
            .payouts
            .get_mut(&vote_key(claim, verifier))
            .ok_or_else(|| StoreError::NotFound(format!("payout {claim}/{verifier}")))?;
        if record.is_settled() {
            return Err(StoreError::Conflict(format!(
                "payout {claim}/{verifier} already settled"
            )));
        }
        record.state = PayoutState::Settled;
        record.settlement_ref = Some(settlement_ref.to_string());
        record.paid_at = Some(at);
        Ok(record.clone())
    }

    fn release_payout(&self, claim: &ClaimId, verifier: &VerifierId) -> Result<(), StoreError> {
        let key = vote_key(claim, verifier);
        let mut t = self.tables();
        match t.payouts.get(&key) {
            Some(record) if record.is_settled() => Err(StoreError::Conflict(format!(
                "payout {claim}/{verifier} already settled"
            ))),
            Some(_) => {
                t.payouts.remove(&key);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn get_payout(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<PayoutRecord>, StoreError> {
        Ok(self.tables().payouts.get(&vote_key(claim, verifier)).cloned())
    }

    fn list_payouts(&self, claim: &ClaimId) -> Result<Vec<PayoutRecord>, StoreError> {
        Ok(scoped(&self.tables().payouts, claim))
    }
}

impl VerifierStore for MemoryStore {
    fn get_verifier(&self, id: &VerifierId) -> Result<Option<Verifier>, StoreError> {
        Ok(self.tables().verifiers.get(id).cloned())
    }

    fn put_verifier(&self, verifier: &Verifier) -> Result<(), StoreError> {
        self.tables()
            .verifiers
            .insert(verifier.id.clone(), verifier.clone());
        Ok(())
    }

    fn list_verifiers(&self) -> Result<Vec<Verifier>, StoreError> {
        Ok(self.tables().verifiers.values().cloned().collect())
    }

    fn apply_outcome(&self, verifier: &Verifier, claim: &ClaimId) -> Result<(), StoreError> {
        let key = vote_key(claim, &verifier.id);
        let mut t = self.tables();
        if !t.outcomes.insert(key) {
            return Err(StoreError::Duplicate(format!(
                "outcome {claim}/{}",
                verifier.id
            )));
        }
        t.verifiers.insert(verifier.id.clone(), verifier.clone());
        Ok(())
    }

    fn outcome_applied(&self, claim: &ClaimId, verifier: &VerifierId) -> Result<bool, StoreError> {
        Ok(self.tables().outcomes.contains(&vote_key(claim, verifier)))
    }
}
