//! Nullable settlement: records every call, fails on demand.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use truthmarket_settlement::{SettlementError, SettlementProvider, SettlementRef};
use truthmarket_types::{ClaimId, Satoshis, VerifierId};

/// One recorded settlement call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementCall {
    pub kind: &'static str,
    pub party: VerifierId,
    pub amount: Satoshis,
    pub claim: ClaimId,
    pub reference: SettlementRef,
}

#[derive(Default)]
struct State {
    calls: Vec<SettlementCall>,
    unavailable: bool,
    rejected: BTreeSet<VerifierId>,
}

/// A settlement provider that never moves funds.
///
/// References are sequential (`null-1`, `null-2`, ...). Set it unavailable
/// to make every call fail with a transient error, or reject individual
/// parties.
#[derive(Default)]
pub struct NullSettlement {
    state: Mutex<State>,
}

impl NullSettlement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    pub fn reject(&self, party: &VerifierId) {
        self.state().rejected.insert(party.clone());
    }

    pub fn accept(&self, party: &VerifierId) {
        self.state().rejected.remove(party);
    }

    /// Every successful call so far, in order.
    pub fn calls(&self) -> Vec<SettlementCall> {
        self.state().calls.clone()
    }

    /// Successful payouts only.
    pub fn payouts(&self) -> Vec<SettlementCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.kind == "payout")
            .cloned()
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(
        &self,
        kind: &'static str,
        party: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        let mut state = self.state();
        if state.unavailable {
            return Err(SettlementError::Unavailable("null settlement offline".into()));
        }
        if state.rejected.contains(party) {
            return Err(SettlementError::Rejected(format!("{party} rejected")));
        }
        let reference = SettlementRef::new(format!("null-{}", state.calls.len() + 1));
        state.calls.push(SettlementCall {
            kind,
            party: party.clone(),
            amount,
            claim: claim.clone(),
            reference: reference.clone(),
        });
        Ok(reference)
    }
}

impl SettlementProvider for NullSettlement {
    fn process_payout(
        &self,
        verifier: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        self.record("payout", verifier, amount, claim)
    }

    fn create_escrow(
        &self,
        submitter: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        self.record("escrow", submitter, amount, claim)
    }

    fn create_commit_escrow(
        &self,
        verifier: &VerifierId,
        amount: Satoshis,
        claim: &ClaimId,
    ) -> Result<SettlementRef, SettlementError> {
        self.record("commit-escrow", verifier, amount, claim)
    }
}
