//! A settlement provider that only records intent.
//!
//! Used by the reference daemon, which has no payment network attached. Each
//! call is logged and acknowledged with a fresh reference.

use crate::{SettlementError, SettlementProvider, SettlementRef};
use tracing::info;
use truthmarket_types::{ClaimId, Satoshis, VerifierId};

#[derive(Debug, Default)]
pub struct JournalSettlement;

impl JournalSettlement {
    pub fn new() -> Self {
        Self
    }

    fn acknowledge(
        &self,
        kind: &'static str,
        party: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        if amount.is_zero() {
            return Err(SettlementError::InvalidAmount(format!("{kind} of {amount}")));
        }
        let reference = SettlementRef::new(format!("journal-{}", uuid::Uuid::new_v4()));
        info!(%kind, %party, %amount, %claim, %reference, "settlement journaled");
        Ok(reference)
    }
}

impl SettlementProvider for JournalSettlement {
    fn process_payout(
        &self,
        verifier: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        self.acknowledge("payout", verifier, amount, claim)
    }

    fn create_escrow(
        &self,
        submitter: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        self.acknowledge("escrow", submitter, amount, claim)
    }

    fn create_commit_escrow(
        &self,
        verifier: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        self.acknowledge("commit-escrow", verifier, amount, claim)
    }
}
