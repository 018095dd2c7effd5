//! Verifier reputation record.

use crate::{ClaimCategory, Timestamp, VerifierId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A verifier's standing. Mutated only by the reputation ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verifier {
    pub id: VerifierId,
    /// Bounded reputation score, see `ReputationParams::{min,max}_reputation`.
    pub reputation_score: f64,
    /// Calibrated accuracy in `[0, 1]`.
    pub calibrated_accuracy: f64,
    pub expertise: BTreeSet<ClaimCategory>,
    pub verification_count: u64,
    pub is_active: bool,
    pub created_at: Timestamp,
    /// Last time an outcome was recorded; drives inactivity decay.
    pub last_active_at: Timestamp,
}

impl Verifier {
    pub fn new(
        id: VerifierId,
        reputation_score: f64,
        calibrated_accuracy: f64,
        expertise: impl IntoIterator<Item = ClaimCategory>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            reputation_score,
            calibrated_accuracy,
            expertise: expertise.into_iter().collect(),
            verification_count: 0,
            is_active: true,
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn has_expertise(&self, category: ClaimCategory) -> bool {
        self.expertise.contains(&category)
    }
}
