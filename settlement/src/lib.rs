//! Settlement capability.
//!
//! The protocol core computes who is owed what; moving funds is delegated to
//! a [`SettlementProvider`]. Escrow creation is invoked by the surrounding
//! application when a claim or commitment is submitted, never by the core.

pub mod error;
pub mod journal;

pub use error::SettlementError;
pub use journal::JournalSettlement;

use serde::{Deserialize, Serialize};
use std::fmt;
use truthmarket_types::{ClaimId, Satoshis, VerifierId};

/// Opaque reference returned by the settlement layer for a completed transfer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementRef(String);

impl SettlementRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SettlementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment backend. Implementations must be safe to call from the sweeper
/// thread and request handlers concurrently.
pub trait SettlementProvider: Send + Sync {
    /// Transfer `amount` to `verifier` as their reward for `claim`.
    fn process_payout(
        &self,
        verifier: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError>;

    /// Lock a submitter's bounty for a claim.
    fn create_escrow(
        &self,
        submitter: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError>;

    /// Lock a verifier's stake alongside a commitment.
    fn create_commit_escrow(
        &self,
        verifier: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError>;
}
