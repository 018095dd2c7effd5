//! Authorization for privileged lifecycle operations.
//!
//! Injected into the lifecycle manager; the core holds no allow-lists of its own.

use std::collections::BTreeSet;
use truthmarket_types::{ClaimId, VerifierId};

pub trait AuthorizationPolicy: Send + Sync {
    fn can_raise_dispute(&self, challenger: &VerifierId, claim: &ClaimId) -> bool;

    fn can_override_status(&self, actor: &VerifierId, claim: &ClaimId) -> bool;
}

/// Anyone may dispute; only the configured operators may override a status.
#[derive(Clone, Debug, Default)]
pub struct OperatorPolicy {
    operators: BTreeSet<VerifierId>,
}

impl OperatorPolicy {
    pub fn new(operators: impl IntoIterator<Item = VerifierId>) -> Self {
        Self {
            operators: operators.into_iter().collect(),
        }
    }
}

impl AuthorizationPolicy for OperatorPolicy {
    fn can_raise_dispute(&self, _challenger: &VerifierId, _claim: &ClaimId) -> bool {
        true
    }

    fn can_override_status(&self, actor: &VerifierId, _claim: &ClaimId) -> bool {
        self.operators.contains(actor)
    }
}
