//! Store-backed reputation ledger.
//!
//! The only writer of [`Verifier`] records. Every read-modify-write runs under
//! the ledger's write lock, so concurrent outcomes for the same verifier are
//! applied one after the other.

use crate::collusion::{combined_suspicion, CollusionDetector, SuspicionScores, UnanimityDetector};
use crate::error::ReputationError;
use crate::math;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};
use truthmarket_store::VerifierStore;
use truthmarket_types::{
    ClaimCategory, ClaimId, Evidence, ReputationParams, Timestamp, Verification, Verifier,
    VerifierId,
};

/// Portable snapshot of a verifier's standing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReputationAttestation {
    pub verifier: VerifierId,
    pub reputation_score: f64,
    pub expertise: Vec<ClaimCategory>,
    pub calibrated_accuracy: f64,
    pub verification_count: u64,
    pub timestamp: Timestamp,
}

impl ReputationAttestation {
    /// JSON with a fixed field order.
    pub fn to_json(&self) -> Result<String, ReputationError> {
        serde_json::to_string(self).map_err(|e| ReputationError::Encoding(e.to_string()))
    }
}

pub struct ReputationLedger {
    store: Arc<dyn VerifierStore + Send + Sync>,
    params: ReputationParams,
    detectors: Vec<Box<dyn CollusionDetector>>,
    write_lock: Mutex<()>,
}

impl ReputationLedger {
    /// Create a ledger with the unanimity detector installed.
    pub fn new(store: Arc<dyn VerifierStore + Send + Sync>, params: ReputationParams) -> Self {
        let unanimity = UnanimityDetector::new(params.unanimity_suspicion);
        Self {
            store,
            params,
            detectors: vec![Box::new(unanimity)],
            write_lock: Mutex::new(()),
        }
    }

    /// Add another collusion detector; its scores are summed with the others.
    pub fn with_detector(mut self, detector: Box<dyn CollusionDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn params(&self) -> &ReputationParams {
        &self.params
    }

    pub fn register_verifier(
        &self,
        id: VerifierId,
        expertise: impl IntoIterator<Item = ClaimCategory>,
        now: Timestamp,
    ) -> Result<Verifier, ReputationError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.store.get_verifier(&id)?.is_some() {
            return Err(ReputationError::AlreadyRegistered(id.to_string()));
        }
        let verifier = Verifier::new(
            id,
            self.params.base_reputation,
            self.params.initial_accuracy,
            expertise,
            now,
        );
        self.store.put_verifier(&verifier)?;
        info!(verifier = %verifier.id, "verifier registered");
        Ok(verifier)
    }

    pub fn get_verifier(&self, id: &VerifierId) -> Result<Option<Verifier>, ReputationError> {
        Ok(self.store.get_verifier(id)?)
    }

    /// Whether a verifier must post an elevated stake to commit.
    pub fn requires_elevated_stake(&self, verifier: &Verifier) -> bool {
        verifier.reputation_score < self.params.reputation_floor
    }

    /// Apply one resolved outcome: Bayesian accuracy update, then the score
    /// multiplier, clamped to the configured bounds.
    ///
    /// At most once per `(claim, verifier)`: a repeat returns the stored
    /// record unchanged.
    pub fn record_outcome(
        &self,
        claim: &ClaimId,
        id: &VerifierId,
        correct: bool,
        confidence: f64,
        category: ClaimCategory,
        now: Timestamp,
    ) -> Result<Verifier, ReputationError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut verifier = self.load(id)?;
        if self.store.outcome_applied(claim, id)? {
            debug!(%claim, verifier = %id, "outcome already applied");
            return Ok(verifier);
        }

        let new_accuracy = math::updated_accuracy(
            verifier.calibrated_accuracy,
            verifier.verification_count,
            correct,
        );
        let multiplier = math::outcome_multiplier(
            &self.params,
            correct,
            verifier.has_expertise(category),
            confidence,
            new_accuracy,
        );
        let previous = verifier.reputation_score;
        verifier.reputation_score = math::clamp_score(&self.params, previous * multiplier);
        verifier.calibrated_accuracy = new_accuracy;
        verifier.verification_count += 1;
        verifier.last_active_at = now;
        self.store.apply_outcome(&verifier, claim)?;

        debug!(
            %claim,
            verifier = %id,
            correct,
            previous,
            score = verifier.reputation_score,
            accuracy = new_accuracy,
            "outcome recorded"
        );
        Ok(verifier)
    }

    /// Pull a verifier's score toward the base after `inactive_months` months.
    pub fn apply_decay(
        &self,
        id: &VerifierId,
        inactive_months: u32,
    ) -> Result<Verifier, ReputationError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut verifier = self.load(id)?;
        verifier.reputation_score =
            math::decayed_score(&self.params, verifier.reputation_score, inactive_months);
        self.store.put_verifier(&verifier)?;
        Ok(verifier)
    }

    /// Summed suspicion per verifier over a claim's reveal set.
    pub fn detect_collusion_signal(
        &self,
        claim: &ClaimId,
        reveals: &[Verification],
    ) -> SuspicionScores {
        let scores = combined_suspicion(&self.detectors, claim, reveals);
        if !scores.is_empty() {
            warn!(%claim, flagged = scores.len(), "collusion signal");
        }
        scores
    }

    pub fn evidence_quality_score(&self, evidence: &[Evidence]) -> f64 {
        math::evidence_quality_score(&self.params, evidence)
    }

    pub fn attestation(
        &self,
        id: &VerifierId,
        now: Timestamp,
    ) -> Result<ReputationAttestation, ReputationError> {
        let verifier = self.load(id)?;
        Ok(ReputationAttestation {
            verifier: verifier.id,
            reputation_score: verifier.reputation_score,
            expertise: verifier.expertise.into_iter().collect(),
            calibrated_accuracy: verifier.calibrated_accuracy,
            verification_count: verifier.verification_count,
            timestamp: now,
        })
    }

    /// Active verifiers with `category` expertise, highest score first.
    pub fn top_verifiers(
        &self,
        category: ClaimCategory,
        limit: usize,
    ) -> Result<Vec<Verifier>, ReputationError> {
        let mut verifiers: Vec<Verifier> = self
            .store
            .list_verifiers()?
            .into_iter()
            .filter(|v| v.is_active && v.has_expertise(category))
            .collect();
        verifiers.sort_by(|a, b| {
            b.reputation_score
                .partial_cmp(&a.reputation_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        verifiers.truncate(limit);
        Ok(verifiers)
    }

    fn load(&self, id: &VerifierId) -> Result<Verifier, ReputationError> {
        self.store
            .get_verifier(id)?
            .ok_or_else(|| ReputationError::UnknownVerifier(id.to_string()))
    }
}
