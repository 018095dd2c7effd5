//! Verifier reputation storage trait.

use crate::StoreError;
use truthmarket_types::{ClaimId, Verifier, VerifierId};

pub trait VerifierStore {
    fn get_verifier(&self, id: &VerifierId) -> Result<Option<Verifier>, StoreError>;

    /// Insert or replace a verifier record.
    fn put_verifier(&self, verifier: &Verifier) -> Result<(), StoreError>;

    fn list_verifiers(&self) -> Result<Vec<Verifier>, StoreError>;

    /// Store `verifier` and mark its outcome for `claim` as applied, in one
    /// step. Fails with `Duplicate` if the outcome was already applied.
    fn apply_outcome(&self, verifier: &Verifier, claim: &ClaimId) -> Result<(), StoreError>;

    fn outcome_applied(&self, claim: &ClaimId, verifier: &VerifierId) -> Result<bool, StoreError>;
}
