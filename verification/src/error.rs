use thiserror::Error;
use truthmarket_crypto::ProofError;
use truthmarket_reputation::ReputationError;
use truthmarket_settlement::SettlementError;
use truthmarket_store::StoreError;
use truthmarket_types::{ClaimId, ClaimStatus, Digest, VerifierId};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{operation} is not allowed while claim {claim} is {actual}")]
    Phase {
        claim: ClaimId,
        actual: ClaimStatus,
        operation: &'static str,
    },

    #[error("a claim with canonical hash {0} already exists")]
    DuplicateClaim(Digest),

    #[error("verifier {verifier} already committed to claim {claim}")]
    DuplicateCommit { claim: ClaimId, verifier: VerifierId },

    #[error("verifier {verifier} has no commitment for claim {claim}")]
    NoCommit { claim: ClaimId, verifier: VerifierId },

    #[error("reveal by {verifier} does not match its commitment for claim {claim}")]
    CommitRevealMismatch { claim: ClaimId, verifier: VerifierId },

    #[error("insufficient quorum for claim {claim}: have {have}, need {need}")]
    InsufficientQuorum { claim: ClaimId, have: usize, need: usize },

    #[error("proof error: {0}")]
    Proof(#[from] ProofError),

    #[error("consensus for claim {0} is already final")]
    AlreadyFinal(ClaimId),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("settlement error: {0}")]
    Settlement(#[from] SettlementError),

    #[error("reputation error: {0}")]
    Reputation(ReputationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ProtocolError {
    /// Whether the same call may succeed if repeated later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProtocolError::InsufficientQuorum { .. } => true,
            ProtocolError::Store(StoreError::Backend(_)) => true,
            ProtocolError::Settlement(e) => e.is_transient(),
            _ => false,
        }
    }

    pub(crate) fn phase(claim: &ClaimId, actual: ClaimStatus, operation: &'static str) -> Self {
        ProtocolError::Phase {
            claim: claim.clone(),
            actual,
            operation,
        }
    }
}

impl From<ReputationError> for ProtocolError {
    fn from(e: ReputationError) -> Self {
        match e {
            ReputationError::UnknownVerifier(id) => ProtocolError::NotFound(format!("verifier {id}")),
            ReputationError::Store(e) => ProtocolError::Store(e),
            other => ProtocolError::Reputation(other),
        }
    }
}
