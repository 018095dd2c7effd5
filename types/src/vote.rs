//! Commit-reveal records.

use crate::{ClaimId, Digest, Timestamp, Verdict, VerifierId};
use serde::{Deserialize, Serialize};

/// A piece of evidence backing a reveal. Evidence content hashes are the
/// leaves of the reveal's Merkle bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub content_hash: Digest,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snapshot_pointer: Option<String>,
    pub content_type: String,
    pub description: String,
    /// Source credibility in `[0, 1]`, when known.
    #[serde(default)]
    pub credibility: Option<f64>,
}

/// An opaque binding of a verifier to a hidden vote.
///
/// Exactly one per `(claim, verifier)`; never carries cleartext vote data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub claim_id: ClaimId,
    pub verifier: VerifierId,
    pub commitment_hash: Digest,
    pub created_at: Timestamp,
}

/// A revealed vote. Exists only after a matching [`Commitment`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub claim_id: ClaimId,
    pub verifier: VerifierId,
    pub verdict: Verdict,
    pub confidence: f64,
    pub evidence: Vec<Evidence>,
    /// Merkle root over evidence content hashes; `None` for an empty bundle.
    pub evidence_root: Option<Digest>,
    /// Copied from the commitment for audit.
    pub commitment_hash: Digest,
    /// Reputation at reveal time; payout shares are weighted by it.
    pub reputation_at_reveal: f64,
    pub revealed_at: Timestamp,
}
