//! Commit-reveal coordinator.
//!
//! Accepts opaque commitments during `COMMIT_PHASE` and reveals during
//! `REVEAL_PHASE`. A reveal is accepted only if recomputing the commitment
//! over the disclosed fields reproduces the stored hash. Phase changes are
//! made by the lifecycle manager; this type only checks them.

use crate::error::ProtocolError;
use crate::locks::ClaimLocks;
use crate::SharedStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use truthmarket_crypto::{compute_commitment, MerkleTree, ProofError, ProofStep};
use truthmarket_reputation::ReputationLedger;
use truthmarket_store::StoreError;
use truthmarket_types::{
    Claim, ClaimId, ClaimStatus, Commitment, Digest, Evidence, Timestamp, Verdict, Verification,
    VerifierId,
};

/// Acknowledgement of an accepted commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub claim_id: ClaimId,
    pub verifier: VerifierId,
    pub commitment_hash: Digest,
    pub committed_at: Timestamp,
    /// The verifier is below the reputation floor; the settlement layer must
    /// collect an elevated stake.
    pub requires_elevated_stake: bool,
}

/// The fields a verifier discloses at reveal time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealRequest {
    pub verdict: Verdict,
    pub confidence: f64,
    pub evidence: Vec<Evidence>,
    pub nonce: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealReceipt {
    pub verification: Verification,
    pub evidence_root: Option<Digest>,
    pub evidence_quality: f64,
}

/// Inclusion proof for one evidence item of a reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceProof {
    pub leaf: Digest,
    pub proof: Vec<ProofStep>,
    pub root: Digest,
}

pub struct CommitRevealCoordinator {
    store: SharedStore,
    ledger: Arc<ReputationLedger>,
    locks: Arc<ClaimLocks>,
}

impl CommitRevealCoordinator {
    pub fn new(store: SharedStore, ledger: Arc<ReputationLedger>, locks: Arc<ClaimLocks>) -> Self {
        Self {
            store,
            ledger,
            locks,
        }
    }

    /// Record `verifier`'s commitment to a hidden vote on `claim_id`.
    pub fn submit_commit(
        &self,
        claim_id: &ClaimId,
        verifier: &VerifierId,
        commitment_hash: Digest,
        now: Timestamp,
    ) -> Result<CommitReceipt, ProtocolError> {
        if commitment_hash.is_zero() {
            return Err(ProtocolError::Validation("commitment hash is empty".into()));
        }

        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            if claim.status != ClaimStatus::CommitPhase {
                return Err(ProtocolError::phase(claim_id, claim.status, "commit"));
            }

            let record = self
                .ledger
                .get_verifier(verifier)?
                .ok_or_else(|| ProtocolError::NotFound(format!("verifier {verifier}")))?;
            if !record.is_active {
                return Err(ProtocolError::Unauthorized(format!(
                    "verifier {verifier} is inactive"
                )));
            }

            let commitment = Commitment {
                claim_id: claim_id.clone(),
                verifier: verifier.clone(),
                commitment_hash,
                created_at: now,
            };
            match self.store.insert_commitment(&commitment) {
                Ok(()) => {}
                Err(StoreError::Duplicate(_)) => {
                    return Err(ProtocolError::DuplicateCommit {
                        claim: claim_id.clone(),
                        verifier: verifier.clone(),
                    })
                }
                Err(e) => return Err(e.into()),
            }

            let requires_elevated_stake = self.ledger.requires_elevated_stake(&record);
            debug!(claim = %claim_id, %verifier, requires_elevated_stake, "commitment accepted");
            Ok(CommitReceipt {
                claim_id: claim_id.clone(),
                verifier: verifier.clone(),
                commitment_hash,
                committed_at: now,
                requires_elevated_stake,
            })
        })
    }

    /// Disclose a committed vote.
    ///
    /// Fails with `NoCommit` without a prior commitment and with
    /// `CommitRevealMismatch` if any disclosed field differs from what was
    /// committed.
    pub fn reveal_verification(
        &self,
        claim_id: &ClaimId,
        verifier: &VerifierId,
        request: RevealRequest,
        now: Timestamp,
    ) -> Result<RevealReceipt, ProtocolError> {
        if !(0.0..=1.0).contains(&request.confidence) {
            return Err(ProtocolError::Validation(format!(
                "confidence {} outside [0, 1]",
                request.confidence
            )));
        }
        if request.nonce.is_empty() {
            return Err(ProtocolError::Validation("nonce must not be empty".into()));
        }

        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            if claim.status != ClaimStatus::RevealPhase {
                return Err(ProtocolError::phase(claim_id, claim.status, "reveal"));
            }

            let commitment = self
                .store
                .get_commitment(claim_id, verifier)?
                .ok_or_else(|| ProtocolError::NoCommit {
                    claim: claim_id.clone(),
                    verifier: verifier.clone(),
                })?;
            if self.store.get_verification(claim_id, verifier)?.is_some() {
                return Err(already_revealed(claim_id, verifier));
            }

            let recomputed = compute_commitment(
                request.verdict,
                request.confidence,
                &request.evidence,
                &request.nonce,
            );
            if recomputed != commitment.commitment_hash {
                return Err(ProtocolError::CommitRevealMismatch {
                    claim: claim_id.clone(),
                    verifier: verifier.clone(),
                });
            }

            let reputation_at_reveal = self
                .ledger
                .get_verifier(verifier)?
                .map(|v| v.reputation_score)
                .unwrap_or(self.ledger.params().base_reputation);
            let evidence_root = evidence_tree(&request.evidence).root();
            let evidence_quality = self.ledger.evidence_quality_score(&request.evidence);

            let verification = Verification {
                claim_id: claim_id.clone(),
                verifier: verifier.clone(),
                verdict: request.verdict,
                confidence: request.confidence,
                evidence: request.evidence,
                evidence_root,
                commitment_hash: commitment.commitment_hash,
                reputation_at_reveal,
                revealed_at: now,
            };
            match self.store.insert_verification(&verification) {
                Ok(()) => {}
                Err(StoreError::Duplicate(_)) => return Err(already_revealed(claim_id, verifier)),
                Err(e) => return Err(e.into()),
            }

            debug!(
                claim = %claim_id,
                %verifier,
                verdict = %verification.verdict,
                evidence = verification.evidence.len(),
                "reveal accepted"
            );
            Ok(RevealReceipt {
                verification,
                evidence_root,
                evidence_quality,
            })
        })
    }

    /// Inclusion proof for evidence item `index` of `verifier`'s reveal.
    pub fn evidence_proof(
        &self,
        claim_id: &ClaimId,
        verifier: &VerifierId,
        index: usize,
    ) -> Result<EvidenceProof, ProtocolError> {
        let verification = self
            .store
            .get_verification(claim_id, verifier)?
            .ok_or_else(|| {
                ProtocolError::NotFound(format!("verification {claim_id}/{verifier}"))
            })?;
        let Some(root) = verification.evidence_root else {
            return Err(ProofError::EmptyTree.into());
        };
        let tree = evidence_tree(&verification.evidence);
        if tree.root() != Some(root) {
            return Err(ProofError::RootMismatch.into());
        }
        let proof = tree.generate_proof(index)?;
        let leaf = tree.leaf(index).ok_or(ProofError::IndexOutOfRange {
            index,
            leaf_count: verification.evidence.len(),
        })?;
        Ok(EvidenceProof { leaf, proof, root })
    }

    fn load_claim(&self, id: &ClaimId) -> Result<Claim, ProtocolError> {
        self.store
            .get_claim(id)?
            .ok_or_else(|| ProtocolError::NotFound(format!("claim {id}")))
    }
}

/// Evidence content hashes are the leaves, in reveal order.
fn evidence_tree(evidence: &[Evidence]) -> MerkleTree {
    MerkleTree::from_leaf_hashes(evidence.iter().map(|e| e.content_hash).collect())
}

fn already_revealed(claim: &ClaimId, verifier: &VerifierId) -> ProtocolError {
    ProtocolError::Validation(format!("verifier {verifier} already revealed for claim {claim}"))
}
