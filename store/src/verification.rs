//! Commitment and reveal storage trait.

use crate::StoreError;
use truthmarket_types::{ClaimId, Commitment, Verification, VerifierId};

/// Stores commit-reveal state. At most one commitment and one reveal per
/// `(claim, verifier)`; a second insert fails with `Duplicate`.
pub trait VerificationStore {
    fn insert_commitment(&self, commitment: &Commitment) -> Result<(), StoreError>;

    fn get_commitment(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<Commitment>, StoreError>;

    fn list_commitments(&self, claim: &ClaimId) -> Result<Vec<Commitment>, StoreError>;

    fn insert_verification(&self, verification: &Verification) -> Result<(), StoreError>;

    fn get_verification(
        &self,
        claim: &ClaimId,
        verifier: &VerifierId,
    ) -> Result<Option<Verification>, StoreError>;

    /// All revealed verifications for a claim, ordered by verifier id.
    fn list_verifications(&self, claim: &ClaimId) -> Result<Vec<Verification>, StoreError>;
}
