//! Claim lifecycle manager.
//!
//! Moves claims through their phases on a deadline schedule, triggers
//! consensus, finalizes after the dispute window and dispatches payouts.
//! Every step is idempotent: re-running a sweep after a crash never
//! double-transitions a claim, applies a reputation outcome twice or pays a
//! verifier twice.

use crate::auth::AuthorizationPolicy;
use crate::consensus::ConsensusAggregator;
use crate::error::ProtocolError;
use crate::locks::ClaimLocks;
use crate::payouts::{payout_shares, reward_pool};
use crate::SharedStore;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};
use truthmarket_reputation::{ReputationLedger, SuspicionScores};
use truthmarket_reputation::ReputationError;
use truthmarket_settlement::SettlementProvider;
use truthmarket_store::StoreError;
use truthmarket_types::{
    Claim, ClaimId, ClaimStatus, ConsensusResult, Dispute, MarketParams, PayoutRecord,
    ProtocolParams, Satoshis, Timestamp, Verdict, VerifierId,
};

/// Events emitted by the lifecycle manager for the host to process.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    PhaseChanged {
        claim: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    },
    /// Reveal phase closed but too few verifiers revealed; retried next sweep.
    QuorumMissed {
        claim: ClaimId,
        have: usize,
        need: usize,
    },
    ConsensusReached {
        claim: ClaimId,
        verdict: Verdict,
        confidence: f64,
    },
    CollusionSuspected {
        claim: ClaimId,
        scores: SuspicionScores,
    },
    Finalized {
        claim: ClaimId,
        verdict: Verdict,
    },
    PayoutIssued {
        claim: ClaimId,
        verifier: VerifierId,
        amount: Satoshis,
        settlement_ref: String,
    },
    PayoutFailed {
        claim: ClaimId,
        verifier: VerifierId,
        reason: String,
    },
    /// Funds were sent but the payout could not be marked settled. The
    /// reservation stays pending and is never retried automatically.
    PayoutUnconfirmed {
        claim: ClaimId,
        verifier: VerifierId,
        amount: Satoshis,
        settlement_ref: String,
    },
    DisputeRaised {
        claim: ClaimId,
        challenger: VerifierId,
    },
}

/// Outcome of one [`LifecycleManager::sweep`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    /// Claims whose status changed or that paid out during this sweep.
    pub advanced: usize,
    /// Claims waiting on a retryable condition (quorum, transient backend).
    pub waiting: usize,
    pub failed: Vec<(ClaimId, String)>,
}

/// What one step of the scheduler did to a claim.
enum Step {
    Idle,
    Advanced,
}

pub struct LifecycleManager {
    store: SharedStore,
    ledger: Arc<ReputationLedger>,
    settlement: Arc<dyn SettlementProvider>,
    auth: Arc<dyn AuthorizationPolicy>,
    locks: Arc<ClaimLocks>,
    aggregator: ConsensusAggregator,
    params: MarketParams,
    pending_events: Mutex<Vec<LifecycleEvent>>,
}

impl LifecycleManager {
    pub fn new(
        store: SharedStore,
        ledger: Arc<ReputationLedger>,
        settlement: Arc<dyn SettlementProvider>,
        auth: Arc<dyn AuthorizationPolicy>,
        locks: Arc<ClaimLocks>,
        params: &ProtocolParams,
    ) -> Self {
        Self {
            store,
            ledger,
            settlement,
            auth,
            locks,
            aggregator: ConsensusAggregator::new(&params.market, &params.reputation),
            params: params.market.clone(),
            pending_events: Mutex::new(Vec::new()),
        }
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events())
    }

    // ── Phase transitions ────────────────────────────────────────────────

    /// `PENDING → COMMIT_PHASE` if both windows still fit before the
    /// deadline, otherwise `PENDING → EXPIRED`.
    pub fn open_commit_phase(
        &self,
        claim_id: &ClaimId,
        now: Timestamp,
    ) -> Result<ClaimStatus, ProtocolError> {
        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            self.open_commit_locked(&claim, now)
        })
    }

    /// `COMMIT_PHASE → REVEAL_PHASE` once the commit window elapsed or the
    /// target commitment count arrived. A window that closes with no
    /// commitments expires the claim. Returns the unchanged status when
    /// neither condition holds yet.
    pub fn open_reveal_phase(
        &self,
        claim_id: &ClaimId,
        now: Timestamp,
    ) -> Result<ClaimStatus, ProtocolError> {
        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            self.open_reveal_locked(&claim, now)
        })
    }

    /// `REVEAL_PHASE → CONSENSUS_REACHED` once the reveal window elapsed or
    /// every committed verifier revealed.
    ///
    /// Without quorum the claim stays in `REVEAL_PHASE` and the call fails
    /// with the retryable `InsufficientQuorum`; past the claim deadline it
    /// expires instead.
    pub fn close_reveal_phase(
        &self,
        claim_id: &ClaimId,
        now: Timestamp,
    ) -> Result<ClaimStatus, ProtocolError> {
        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            self.close_reveal_locked(&claim, now)
        })
    }

    /// Compute the consensus for a claim from its current reveal set.
    /// Pure: nothing is stored.
    pub fn calculate_consensus(
        &self,
        claim_id: &ClaimId,
        now: Timestamp,
    ) -> Result<ConsensusResult, ProtocolError> {
        let claim = self.load_claim(claim_id)?;
        self.compute(&claim, now)
    }

    /// Mark the consensus final and the claim `FINALIZED`, then record
    /// reputation outcomes and pay the winners.
    ///
    /// Single-writer: the final flag is flipped by compare-and-swap and a
    /// repeated call fails with `AlreadyFinal`. If recording outcomes fails
    /// the error is returned with the claim already `FINALIZED`; the next
    /// sweep applies whatever is missing. Payout failures are left to the
    /// sweep as well.
    pub fn finalize_claim(
        &self,
        claim_id: &ClaimId,
        now: Timestamp,
    ) -> Result<ConsensusResult, ProtocolError> {
        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            self.finalize_locked(&claim, now)
        })
    }

    /// Pay every winning verifier of a finalized claim who has not been paid,
    /// applying any reputation outcome still missing first.
    ///
    /// Returns the payouts made by this call. Every share is attempted; the
    /// first failure is returned only if nothing was paid.
    pub fn process_payouts(
        &self,
        claim_id: &ClaimId,
        now: Timestamp,
    ) -> Result<Vec<PayoutRecord>, ProtocolError> {
        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            if claim.status != ClaimStatus::Finalized {
                return Err(ProtocolError::phase(claim_id, claim.status, "payout"));
            }
            let result = self.load_result(claim_id)?;
            if !result.is_final {
                return Err(ProtocolError::phase(claim_id, claim.status, "payout"));
            }
            self.settle_finalized_locked(&claim, &result, now)
        })
    }

    /// Challenge a consensus result inside the dispute window.
    pub fn raise_dispute(
        &self,
        claim_id: &ClaimId,
        challenger: &VerifierId,
        bond: Satoshis,
        reason: &str,
        now: Timestamp,
    ) -> Result<Dispute, ProtocolError> {
        if !self.auth.can_raise_dispute(challenger, claim_id) {
            return Err(ProtocolError::Unauthorized(format!(
                "{challenger} may not dispute claim {claim_id}"
            )));
        }
        if reason.trim().is_empty() {
            return Err(ProtocolError::Validation("dispute reason must not be empty".into()));
        }
        if bond < self.params.min_stake {
            return Err(ProtocolError::Validation(format!(
                "dispute bond {bond} below minimum {}",
                self.params.min_stake
            )));
        }

        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            if claim.status != ClaimStatus::ConsensusReached
                || self.dispute_window_elapsed(&claim, now)
            {
                return Err(ProtocolError::phase(claim_id, claim.status, "dispute"));
            }

            let dispute = Dispute {
                claim_id: claim_id.clone(),
                challenger: challenger.clone(),
                bond,
                reason: reason.trim().to_string(),
                raised_at: now,
            };
            self.store.insert_dispute(&dispute)?;
            self.transition(&claim, ClaimStatus::Disputed, now)?;
            warn!(claim = %claim_id, %challenger, %bond, "dispute raised");
            self.emit(LifecycleEvent::DisputeRaised {
                claim: claim_id.clone(),
                challenger: challenger.clone(),
            });
            Ok(dispute)
        })
    }

    /// Operator transition. Authorized by the injected policy and still
    /// limited to the transition table.
    pub fn override_status(
        &self,
        actor: &VerifierId,
        claim_id: &ClaimId,
        next: ClaimStatus,
        now: Timestamp,
    ) -> Result<Claim, ProtocolError> {
        if !self.auth.can_override_status(actor, claim_id) {
            return Err(ProtocolError::Unauthorized(format!(
                "{actor} may not override claim {claim_id}"
            )));
        }
        if next == ClaimStatus::Finalized {
            return Err(ProtocolError::Validation(
                "claims are finalized only through finalize_claim".into(),
            ));
        }
        self.locks.with_claim(claim_id, || {
            let claim = self.load_claim(claim_id)?;
            let updated = self.transition(&claim, next, now)?;
            info!(claim = %claim_id, %actor, to = %next, "status overridden");
            Ok(updated)
        })
    }

    // ── Scheduler ────────────────────────────────────────────────────────

    /// Drive every live claim one step and retry outstanding payouts.
    ///
    /// The claim set is listed once up front, so a claim advances at most
    /// one phase per sweep. Failures are isolated per claim and collected in
    /// the report.
    pub fn sweep(&self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();
        let mut live = Vec::new();
        for status in [
            ClaimStatus::Pending,
            ClaimStatus::CommitPhase,
            ClaimStatus::RevealPhase,
            ClaimStatus::ConsensusReached,
            ClaimStatus::Finalized,
        ] {
            match self.store.list_claims_by_status(status) {
                Ok(claims) => live.extend(claims.into_iter().map(|c| c.id)),
                Err(e) => warn!(%status, error = %e, "sweep could not list claims"),
            }
        }

        for claim_id in live {
            report.examined += 1;
            match self.step(&claim_id, now) {
                Ok(Step::Advanced) => report.advanced += 1,
                Ok(Step::Idle) => {}
                Err(e) if e.is_retryable() => report.waiting += 1,
                Err(e) => {
                    warn!(claim = %claim_id, error = %e, "sweep step failed");
                    report.failed.push((claim_id.clone(), e.to_string()));
                }
            }
        }
        if report.advanced > 0 || !report.failed.is_empty() {
            info!(
                examined = report.examined,
                advanced = report.advanced,
                waiting = report.waiting,
                failed = report.failed.len(),
                "sweep complete"
            );
        }
        report
    }

    fn step(&self, claim_id: &ClaimId, now: Timestamp) -> Result<Step, ProtocolError> {
        self.locks.with_claim(claim_id, || {
            // Re-read under the lock; the listing may be stale.
            let claim = self.load_claim(claim_id)?;
            let before = claim.status;
            let after = match claim.status {
                ClaimStatus::Pending => self.open_commit_locked(&claim, now)?,
                ClaimStatus::CommitPhase => self.open_reveal_locked(&claim, now)?,
                ClaimStatus::RevealPhase => self.close_reveal_locked(&claim, now)?,
                ClaimStatus::ConsensusReached => {
                    if !self.dispute_window_elapsed(&claim, now) {
                        return Ok(Step::Idle);
                    }
                    self.finalize_locked(&claim, now)?;
                    ClaimStatus::Finalized
                }
                ClaimStatus::Finalized => {
                    let result = self.load_result(claim_id)?;
                    if !result.is_final {
                        return Ok(Step::Idle);
                    }
                    let paid = self.settle_finalized_locked(&claim, &result, now)?;
                    return Ok(if paid.is_empty() { Step::Idle } else { Step::Advanced });
                }
                ClaimStatus::Disputed | ClaimStatus::Expired => before,
            };
            Ok(if after == before { Step::Idle } else { Step::Advanced })
        })
    }

    // ── Locked step bodies (caller holds the claim lock) ─────────────────

    fn open_commit_locked(&self, claim: &Claim, now: Timestamp) -> Result<ClaimStatus, ProtocolError> {
        if claim.status != ClaimStatus::Pending {
            return Err(ProtocolError::phase(&claim.id, claim.status, "open commit phase"));
        }
        let lead = claim.deadline.remaining_from(now);
        let next = if lead >= self.params.verification_window_secs() {
            ClaimStatus::CommitPhase
        } else {
            ClaimStatus::Expired
        };
        Ok(self.transition(claim, next, now)?.status)
    }

    fn open_reveal_locked(&self, claim: &Claim, now: Timestamp) -> Result<ClaimStatus, ProtocolError> {
        if claim.status != ClaimStatus::CommitPhase {
            return Err(ProtocolError::phase(&claim.id, claim.status, "open reveal phase"));
        }
        let commitments = self.store.list_commitments(&claim.id)?.len();
        let window_elapsed = claim
            .phase_started_at()
            .has_expired(self.params.commit_window_secs, now);
        let target = self.params.target_commitments as usize;
        let target_reached = target > 0 && commitments >= target;

        if !window_elapsed && !target_reached {
            return Ok(claim.status);
        }
        let next = if commitments == 0 {
            ClaimStatus::Expired
        } else {
            ClaimStatus::RevealPhase
        };
        Ok(self.transition(claim, next, now)?.status)
    }

    fn close_reveal_locked(&self, claim: &Claim, now: Timestamp) -> Result<ClaimStatus, ProtocolError> {
        if claim.status != ClaimStatus::RevealPhase {
            return Err(ProtocolError::phase(&claim.id, claim.status, "close reveal phase"));
        }
        let commitments = self.store.list_commitments(&claim.id)?.len();
        let reveals = self.store.list_verifications(&claim.id)?.len();
        let window_elapsed = claim
            .phase_started_at()
            .has_expired(self.params.reveal_window_secs, now);
        let all_revealed = commitments > 0 && reveals >= commitments;
        if !window_elapsed && !all_revealed {
            return Ok(claim.status);
        }

        let result = match self.compute(claim, now) {
            Ok(result) => result,
            Err(ProtocolError::InsufficientQuorum { claim: id, have, need }) => {
                if now >= claim.deadline {
                    warn!(claim = %id, have, need, "quorum never reached, claim expired");
                    return Ok(self.transition(claim, ClaimStatus::Expired, now)?.status);
                }
                warn!(claim = %id, have, need, "quorum not reached");
                self.emit(LifecycleEvent::QuorumMissed {
                    claim: id.clone(),
                    have,
                    need,
                });
                return Err(ProtocolError::InsufficientQuorum { claim: id, have, need });
            }
            Err(e) => return Err(e),
        };

        self.store.save_consensus_result(&result)?;
        self.transition(claim, ClaimStatus::ConsensusReached, now)?;
        info!(
            claim = %claim.id,
            verdict = %result.verdict,
            confidence = result.confidence,
            verifiers = result.participating_verifiers.len(),
            "consensus reached"
        );
        self.emit(LifecycleEvent::ConsensusReached {
            claim: claim.id.clone(),
            verdict: result.verdict,
            confidence: result.confidence,
        });

        let reveals = self.store.list_verifications(&claim.id)?;
        let scores = self.ledger.detect_collusion_signal(&claim.id, &reveals);
        if !scores.is_empty() {
            self.emit(LifecycleEvent::CollusionSuspected {
                claim: claim.id.clone(),
                scores,
            });
        }
        Ok(ClaimStatus::ConsensusReached)
    }

    fn finalize_locked(&self, claim: &Claim, now: Timestamp) -> Result<ConsensusResult, ProtocolError> {
        match claim.status {
            ClaimStatus::ConsensusReached => {}
            ClaimStatus::Finalized => return Err(ProtocolError::AlreadyFinal(claim.id.clone())),
            other => return Err(ProtocolError::phase(&claim.id, other, "finalize")),
        }
        if !self.dispute_window_elapsed(claim, now) {
            return Err(ProtocolError::phase(
                &claim.id,
                claim.status,
                "finalize before the dispute window closes",
            ));
        }

        // A false return with the claim still in CONSENSUS_REACHED means an
        // earlier finalize flipped the flag and stopped before the status
        // write; outcomes and payouts only ever run after that write, so the
        // finalize is completed here.
        let flipped = self.store.finalize_consensus_result(&claim.id, now)?;
        if !flipped {
            debug!(claim = %claim.id, "completing interrupted finalize");
        }
        self.transition(claim, ClaimStatus::Finalized, now)?;
        let result = self.load_result(&claim.id)?;
        info!(claim = %claim.id, verdict = %result.verdict, "claim finalized");
        self.emit(LifecycleEvent::Finalized {
            claim: claim.id.clone(),
            verdict: result.verdict,
        });

        self.apply_outcomes_locked(claim, &result, now)?;
        // Unpaid shares are retried by the next sweep.
        if let Err(e) = self.pay_out(claim, &result, now) {
            warn!(claim = %claim.id, error = %e, "payouts incomplete");
        }
        Ok(result)
    }

    /// Outcomes first, then payouts. Both are safe to repeat.
    fn settle_finalized_locked(
        &self,
        claim: &Claim,
        result: &ConsensusResult,
        now: Timestamp,
    ) -> Result<Vec<PayoutRecord>, ProtocolError> {
        self.apply_outcomes_locked(claim, result, now)?;
        self.pay_out(claim, result, now)
    }

    /// Record the reputation outcome of every reveal. The ledger skips
    /// outcomes already applied for this claim; store failures stop the pass.
    fn apply_outcomes_locked(
        &self,
        claim: &Claim,
        result: &ConsensusResult,
        now: Timestamp,
    ) -> Result<(), ProtocolError> {
        for reveal in self.store.list_verifications(&claim.id)? {
            let correct = reveal.verdict == result.verdict;
            match self.ledger.record_outcome(
                &claim.id,
                &reveal.verifier,
                correct,
                reveal.confidence,
                claim.category,
                now,
            ) {
                Ok(_) => {}
                Err(ReputationError::UnknownVerifier(v)) => {
                    warn!(claim = %claim.id, verifier = %v, "outcome skipped for unknown verifier");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Each share is reserved as a pending record before the settlement
    /// call and marked settled after it. Any existing record, settled or
    /// pending, means the share is never sent again.
    fn pay_out(
        &self,
        claim: &Claim,
        result: &ConsensusResult,
        now: Timestamp,
    ) -> Result<Vec<PayoutRecord>, ProtocolError> {
        let reveals = self.store.list_verifications(&claim.id)?;
        let pool = reward_pool(claim.bounty, &self.params);
        let mut paid = Vec::new();
        let mut first_error: Option<ProtocolError> = None;

        for share in payout_shares(pool, result.verdict, &reveals) {
            if share.amount.is_zero() {
                continue;
            }
            if let Some(existing) = self.store.get_payout(&claim.id, &share.verifier)? {
                if !existing.is_settled() {
                    debug!(claim = %claim.id, verifier = %share.verifier, "payout pending reconciliation");
                }
                continue;
            }
            let reservation =
                PayoutRecord::pending(claim.id.clone(), share.verifier.clone(), share.amount, now);
            match self.store.reserve_payout(&reservation) {
                Ok(()) => {}
                Err(StoreError::Duplicate(_)) => continue,
                Err(e) => {
                    warn!(claim = %claim.id, verifier = %share.verifier, error = %e, "payout not reserved");
                    first_error.get_or_insert(e.into());
                    continue;
                }
            }

            let reference =
                match self
                    .settlement
                    .process_payout(&share.verifier, share.amount, &claim.id)
                {
                    Ok(reference) => reference.into_string(),
                    Err(e) => {
                        warn!(claim = %claim.id, verifier = %share.verifier, error = %e, "payout failed");
                        if let Err(release) = self.store.release_payout(&claim.id, &share.verifier) {
                            warn!(
                                claim = %claim.id,
                                verifier = %share.verifier,
                                error = %release,
                                "refused payout left reserved"
                            );
                        }
                        self.emit(LifecycleEvent::PayoutFailed {
                            claim: claim.id.clone(),
                            verifier: share.verifier.clone(),
                            reason: e.to_string(),
                        });
                        first_error.get_or_insert(e.into());
                        continue;
                    }
                };

            match self
                .store
                .settle_payout(&claim.id, &share.verifier, &reference, now)
            {
                Ok(record) => {
                    info!(
                        claim = %claim.id,
                        verifier = %record.verifier,
                        amount = %record.amount,
                        settlement_ref = %reference,
                        "payout issued"
                    );
                    self.emit(LifecycleEvent::PayoutIssued {
                        claim: claim.id.clone(),
                        verifier: record.verifier.clone(),
                        amount: record.amount,
                        settlement_ref: reference,
                    });
                    paid.push(record);
                }
                Err(e) => {
                    warn!(
                        claim = %claim.id,
                        verifier = %share.verifier,
                        amount = %share.amount,
                        settlement_ref = %reference,
                        error = %e,
                        "payout sent but not recorded"
                    );
                    self.emit(LifecycleEvent::PayoutUnconfirmed {
                        claim: claim.id.clone(),
                        verifier: share.verifier.clone(),
                        amount: share.amount,
                        settlement_ref: reference,
                    });
                    first_error.get_or_insert(e.into());
                }
            }
        }

        match first_error {
            Some(e) if paid.is_empty() => Err(e),
            Some(e) => {
                debug!(claim = %claim.id, error = %e, "partial payout");
                Ok(paid)
            }
            None => Ok(paid),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn compute(&self, claim: &Claim, now: Timestamp) -> Result<ConsensusResult, ProtocolError> {
        let reveals = self.store.list_verifications(&claim.id)?;
        let mut verifiers = BTreeMap::new();
        for reveal in &reveals {
            if let Some(v) = self.ledger.get_verifier(&reveal.verifier)? {
                verifiers.insert(v.id.clone(), v);
            }
        }
        self.aggregator.calculate(claim, &reveals, &verifiers, now)
    }

    /// Validate against the transition table and compare-and-swap the status.
    fn transition(&self, claim: &Claim, next: ClaimStatus, now: Timestamp) -> Result<Claim, ProtocolError> {
        claim
            .status
            .transition(next)
            .map_err(|_| ProtocolError::phase(&claim.id, claim.status, next.as_str()))?;
        let updated = match self.store.update_claim_status(&claim.id, claim.status, next, now) {
            Ok(updated) => updated,
            Err(StoreError::Conflict(_)) => {
                return Err(ProtocolError::phase(&claim.id, claim.status, next.as_str()))
            }
            Err(e) => return Err(e.into()),
        };
        info!(claim = %claim.id, from = %claim.status, to = %next, "claim status changed");
        self.emit(LifecycleEvent::PhaseChanged {
            claim: claim.id.clone(),
            from: claim.status,
            to: next,
        });
        Ok(updated)
    }

    fn dispute_window_elapsed(&self, claim: &Claim, now: Timestamp) -> bool {
        claim
            .phase_started_at()
            .has_expired(self.params.dispute_window_secs, now)
    }

    fn load_claim(&self, id: &ClaimId) -> Result<Claim, ProtocolError> {
        self.store
            .get_claim(id)?
            .ok_or_else(|| ProtocolError::NotFound(format!("claim {id}")))
    }

    fn load_result(&self, id: &ClaimId) -> Result<ConsensusResult, ProtocolError> {
        self.store
            .get_consensus_result(id)?
            .ok_or_else(|| ProtocolError::NotFound(format!("consensus for {id}")))
    }

    fn emit(&self, event: LifecycleEvent) {
        self.events().push(event);
    }

    fn events(&self) -> std::sync::MutexGuard<'_, Vec<LifecycleEvent>> {
        self.pending_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
