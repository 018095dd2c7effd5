//! Claim storage trait.

use crate::StoreError;
use truthmarket_types::{Claim, ClaimId, ClaimStatus, Digest, Timestamp};

pub trait ClaimStore {
    /// Insert a new claim. Fails with `Duplicate` if the id or the canonical
    /// hash is already present.
    fn insert_claim(&self, claim: &Claim) -> Result<(), StoreError>;

    fn get_claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError>;

    fn find_claim_by_hash(&self, canonical_hash: &Digest) -> Result<Option<Claim>, StoreError>;

    /// Atomically move a claim from `expected` to `next`, stamping `updated_at`.
    ///
    /// Fails with `Conflict` if the stored status is not `expected` and with
    /// `NotFound` if the claim does not exist. Returns the updated claim.
    fn update_claim_status(
        &self,
        id: &ClaimId,
        expected: ClaimStatus,
        next: ClaimStatus,
        at: Timestamp,
    ) -> Result<Claim, StoreError>;

    fn list_claims_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, StoreError>;
}
