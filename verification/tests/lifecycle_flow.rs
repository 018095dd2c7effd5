//! End-to-end claim lifecycle over the in-memory store and null settlement,
//! including injected store failures at each crash point.

use std::sync::Arc;

use truthmarket_crypto::{compute_commitment, generate_nonce, sha256};
use truthmarket_nullables::{FlakyStore, NullClock, NullSettlement, StoreOp};
use truthmarket_store::{ConsensusStore, VerifierStore};
use truthmarket_types::{
    ClaimCategory, ClaimDraft, ClaimId, ClaimStatus, ClaimType, Evidence, PayoutState,
    ProtocolParams, Satoshis, Timestamp, Verdict, VerifierId,
};
use truthmarket_verification::{
    LifecycleEvent, OperatorPolicy, ProtocolError, RevealRequest, TruthMarket,
};

const DAY: u64 = 86_400;
const T0: u64 = 1_700_000_000;

struct Harness {
    store: Arc<FlakyStore>,
    settlement: Arc<NullSettlement>,
    clock: NullClock,
    market: TruthMarket,
}

impl Harness {
    fn new() -> Self {
        Self::with_params(ProtocolParams::default())
    }

    fn with_params(params: ProtocolParams) -> Self {
        let store = Arc::new(FlakyStore::new());
        let settlement = Arc::new(NullSettlement::new());
        let policy = Arc::new(OperatorPolicy::new([VerifierId::new("operator")]));
        let market = TruthMarket::with_policy(store.clone(), settlement.clone(), policy, params);
        Self {
            store,
            settlement,
            clock: NullClock::new(T0),
            market,
        }
    }

    fn verifier(&self, name: &str, score: f64, expert: bool) -> VerifierId {
        let id = VerifierId::new(name);
        let expertise = if expert {
            vec![ClaimCategory::Business]
        } else {
            Vec::new()
        };
        let mut v = self
            .market
            .ledger
            .register_verifier(id.clone(), expertise, self.clock.now())
            .unwrap();
        v.reputation_score = score;
        self.store.put_verifier(&v).unwrap();
        id
    }

    fn submit(&self, deadline_days: u64) -> ClaimId {
        let draft = ClaimDraft {
            claim_type: ClaimType::Financial,
            subject: "Acme Corp".into(),
            predicate: "reported quarterly revenue of".into(),
            object: format!("${deadline_days}M"),
            time_window: None,
            jurisdiction: Some("US".into()),
            category: ClaimCategory::Business,
            bounty: Satoshis::new(10_000),
            stake: Satoshis::new(500),
            deadline: Timestamp::new(T0 + deadline_days * DAY),
            sources: Vec::new(),
        };
        self.market
            .claims
            .submit_claim(draft, VerifierId::new("submitter"), self.clock.now())
            .unwrap()
            .id
    }

    fn status(&self, claim: &ClaimId) -> ClaimStatus {
        self.market.claims.get_claim(claim).unwrap().status
    }

    fn commit(&self, claim: &ClaimId, verifier: &VerifierId, verdict: Verdict) -> RevealRequest {
        let request = RevealRequest {
            verdict,
            confidence: 0.8,
            evidence: vec![Evidence {
                content_hash: sha256(verifier.as_str().as_bytes()),
                url: Some("https://example.org/filing".into()),
                snapshot_pointer: None,
                content_type: "text/html".into(),
                description: "quarterly filing".into(),
                credibility: Some(0.9),
            }],
            nonce: generate_nonce(),
        };
        let hash = compute_commitment(
            request.verdict,
            request.confidence,
            &request.evidence,
            &request.nonce,
        );
        self.market
            .coordinator
            .submit_commit(claim, verifier, hash, self.clock.now())
            .unwrap();
        request
    }

    fn reveal(&self, claim: &ClaimId, verifier: &VerifierId, request: RevealRequest) {
        self.market
            .coordinator
            .reveal_verification(claim, verifier, request, self.clock.now())
            .unwrap();
    }

    fn sweep(&self) -> truthmarket_verification::SweepReport {
        self.market.lifecycle.sweep(self.clock.now())
    }

    fn verification_count(&self, id: &VerifierId) -> u64 {
        self.market.ledger.get_verifier(id).unwrap().unwrap().verification_count
    }

    fn paid_parties(&self) -> Vec<VerifierId> {
        let mut parties: Vec<_> = self.settlement.payouts().into_iter().map(|p| p.party).collect();
        parties.sort();
        parties
    }
}

/// Submit, commit three votes, reveal them and close on full participation.
fn reach_consensus(h: &Harness) -> (ClaimId, [VerifierId; 3]) {
    let a = h.verifier("a", 2.0, false);
    let b = h.verifier("b", 2.0, false);
    let c = h.verifier("c", 1.0, false);
    let claim = h.submit(5);

    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::CommitPhase);

    h.clock.advance(10);
    let ra = h.commit(&claim, &a, Verdict::True);
    let rb = h.commit(&claim, &b, Verdict::True);
    let rc = h.commit(&claim, &c, Verdict::False);

    h.clock.advance(DAY);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::RevealPhase);

    h.clock.advance(10);
    h.reveal(&claim, &a, ra);
    h.reveal(&claim, &b, rb);
    h.reveal(&claim, &c, rc);

    h.clock.advance(10);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::ConsensusReached);
    (claim, [a, b, c])
}

#[test]
fn full_lifecycle_pays_winners_once() {
    let h = Harness::new();
    let (claim, [a, b, c]) = reach_consensus(&h);

    let result = h.store.get_consensus_result(&claim).unwrap().unwrap();
    assert_eq!(result.verdict, Verdict::True);
    assert!((result.confidence - 0.8).abs() < 1e-12);
    assert!(!result.is_final);

    // Inside the dispute window nothing happens.
    h.clock.advance(DAY);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::ConsensusReached);

    h.clock.advance(DAY);
    let report = h.sweep();
    assert_eq!(report.examined, 1);
    assert_eq!(report.advanced, 1);
    assert_eq!(h.status(&claim), ClaimStatus::Finalized);
    let result = h.store.get_consensus_result(&claim).unwrap().unwrap();
    assert!(result.is_final);
    assert_eq!(result.finalized_at, Some(h.clock.now()));

    let payouts = h.settlement.payouts();
    assert_eq!(payouts.len(), 2);
    assert!(payouts.iter().all(|p| p.amount == Satoshis::new(4_900)));
    assert!(payouts.iter().all(|p| p.party != c));

    // Re-running the sweep and the explicit operations never pays again.
    h.sweep();
    assert!(h
        .market
        .lifecycle
        .process_payouts(&claim, h.clock.now())
        .unwrap()
        .is_empty());
    assert_eq!(h.settlement.payouts().len(), 2);
    assert!(matches!(
        h.market.lifecycle.finalize_claim(&claim, h.clock.now()),
        Err(ProtocolError::AlreadyFinal(_))
    ));

    // Winners gained reputation, the dissenter lost some.
    let score = |id: &VerifierId| h.market.ledger.get_verifier(id).unwrap().unwrap().reputation_score;
    assert!(score(&a) > 2.0);
    assert!(score(&b) > 2.0);
    assert!(score(&c) < 1.0);

    let events = h.market.lifecycle.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, LifecycleEvent::Finalized { verdict: Verdict::True, .. })));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::PayoutIssued { .. }))
            .count(),
        2
    );
    assert!(h.market.lifecycle.drain_events().is_empty());
}

#[test]
fn unanimous_reveals_raise_collusion_signal() {
    let h = Harness::with_params({
        let mut p = ProtocolParams::default();
        p.market.min_quorum = 2;
        p
    });
    let a = h.verifier("a", 1.0, true);
    let b = h.verifier("b", 1.0, true);
    let claim = h.submit(5);
    h.sweep();
    let ra = h.commit(&claim, &a, Verdict::MostlyTrue);
    let rb = h.commit(&claim, &b, Verdict::MostlyTrue);
    h.clock.advance(DAY);
    h.sweep();
    h.reveal(&claim, &a, ra);
    h.reveal(&claim, &b, rb);
    h.sweep();

    let events = h.market.lifecycle.drain_events();
    let scores = events
        .iter()
        .find_map(|e| match e {
            LifecycleEvent::CollusionSuspected { scores, .. } => Some(scores.clone()),
            _ => None,
        })
        .expect("collusion event");
    assert_eq!(scores.len(), 2);
    assert!(scores.values().all(|s| (*s - 0.3).abs() < 1e-12));
}

#[test]
fn quorum_miss_is_retried_until_third_reveal() {
    let h = Harness::new();
    let a = h.verifier("a", 1.0, false);
    let b = h.verifier("b", 1.0, false);
    let c = h.verifier("c", 1.0, false);
    let claim = h.submit(5);
    h.sweep();
    let ra = h.commit(&claim, &a, Verdict::False);
    let rb = h.commit(&claim, &b, Verdict::False);
    let rc = h.commit(&claim, &c, Verdict::MostlyFalse);
    h.clock.advance(DAY);
    h.sweep();
    h.reveal(&claim, &a, ra);
    h.reveal(&claim, &b, rb);

    h.clock.advance(DAY);
    let err = h
        .market
        .lifecycle
        .close_reveal_phase(&claim, h.clock.now())
        .unwrap_err();
    assert!(matches!(err, ProtocolError::InsufficientQuorum { have: 2, need: 3, .. }));
    assert!(err.is_retryable());
    assert_eq!(h.status(&claim), ClaimStatus::RevealPhase);

    let report = h.sweep();
    assert_eq!(report.waiting, 1);
    assert!(report.failed.is_empty());

    h.reveal(&claim, &c, rc);
    assert_eq!(
        h.market
            .lifecycle
            .close_reveal_phase(&claim, h.clock.now())
            .unwrap(),
        ClaimStatus::ConsensusReached
    );
    let result = h.store.get_consensus_result(&claim).unwrap().unwrap();
    assert_eq!(result.verdict, Verdict::False);
}

#[test]
fn quorum_never_reached_expires_at_deadline() {
    let h = Harness::new();
    let a = h.verifier("a", 1.0, false);
    let claim = h.submit(3);
    h.sweep();
    let ra = h.commit(&claim, &a, Verdict::True);
    h.clock.advance(DAY);
    h.sweep();
    h.reveal(&claim, &a, ra);

    h.clock.advance(DAY);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::RevealPhase);

    h.clock.set(T0 + 3 * DAY);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::Expired);
}

#[test]
fn claims_lapse_without_time_or_commitments() {
    let h = Harness::new();

    // One day of lead time cannot fit both windows.
    let short = h.submit(1);
    h.sweep();
    assert_eq!(h.status(&short), ClaimStatus::Expired);

    let unattended = h.submit(5);
    h.sweep();
    assert_eq!(h.status(&unattended), ClaimStatus::CommitPhase);
    h.clock.advance(DAY);
    h.sweep();
    assert_eq!(h.status(&unattended), ClaimStatus::Expired);
}

#[test]
fn target_commitments_open_reveal_early() {
    let h = Harness::with_params({
        let mut p = ProtocolParams::default();
        p.market.target_commitments = 2;
        p
    });
    let a = h.verifier("a", 1.0, false);
    let b = h.verifier("b", 1.0, false);
    let claim = h.submit(5);
    h.sweep();
    h.commit(&claim, &a, Verdict::True);
    assert_eq!(
        h.market.lifecycle.open_reveal_phase(&claim, h.clock.now()).unwrap(),
        ClaimStatus::CommitPhase
    );
    h.commit(&claim, &b, Verdict::True);
    assert_eq!(
        h.market.lifecycle.open_reveal_phase(&claim, h.clock.now()).unwrap(),
        ClaimStatus::RevealPhase
    );
}

#[test]
fn dispute_inside_window_blocks_finalize() {
    let h = Harness::new();
    let (claim, _) = reach_consensus(&h);
    let challenger = VerifierId::new("challenger");

    h.clock.advance(DAY);
    let dispute = h
        .market
        .lifecycle
        .raise_dispute(&claim, &challenger, Satoshis::new(1_000), "filing was restated", h.clock.now())
        .unwrap();
    assert_eq!(dispute.reason, "filing was restated");
    assert_eq!(h.status(&claim), ClaimStatus::Disputed);

    h.clock.advance(2 * DAY);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::Disputed);
    assert!(h.settlement.payouts().is_empty());
    assert!(matches!(
        h.market.lifecycle.finalize_claim(&claim, h.clock.now()),
        Err(ProtocolError::Phase { actual: ClaimStatus::Disputed, .. })
    ));
}

#[test]
fn dispute_after_window_is_rejected() {
    let h = Harness::new();
    let (claim, _) = reach_consensus(&h);
    h.clock.advance(2 * DAY);
    let err = h
        .market
        .lifecycle
        .raise_dispute(&claim, &VerifierId::new("late"), Satoshis::new(1_000), "too late", h.clock.now())
        .unwrap_err();
    assert!(matches!(err, ProtocolError::Phase { .. }));
}

#[test]
fn early_finalize_is_rejected() {
    let h = Harness::new();
    let (claim, _) = reach_consensus(&h);
    assert!(matches!(
        h.market.lifecycle.finalize_claim(&claim, h.clock.now()),
        Err(ProtocolError::Phase { actual: ClaimStatus::ConsensusReached, .. })
    ));
    assert!(!h.store.get_consensus_result(&claim).unwrap().unwrap().is_final);
}

#[test]
fn failed_payouts_are_retried_by_sweep() {
    let h = Harness::new();
    let (claim, _) = reach_consensus(&h);

    h.settlement.set_unavailable(true);
    h.clock.advance(2 * DAY);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::Finalized);
    assert!(h.settlement.payouts().is_empty());
    assert!(h.store.list_payouts(&claim).unwrap().is_empty());

    let report = h.sweep();
    assert_eq!(report.waiting, 1);

    h.settlement.set_unavailable(false);
    let report = h.sweep();
    assert_eq!(report.advanced, 1);
    assert_eq!(h.settlement.payouts().len(), 2);

    h.sweep();
    assert_eq!(h.settlement.payouts().len(), 2);
}

#[test]
fn override_requires_operator_and_legal_transition() {
    let h = Harness::new();
    let claim = h.submit(5);
    let now = h.clock.now();

    assert!(matches!(
        h.market
            .lifecycle
            .override_status(&VerifierId::new("mallory"), &claim, ClaimStatus::Expired, now),
        Err(ProtocolError::Unauthorized(_))
    ));

    let operator = VerifierId::new("operator");
    assert!(matches!(
        h.market
            .lifecycle
            .override_status(&operator, &claim, ClaimStatus::RevealPhase, now),
        Err(ProtocolError::Phase { .. })
    ));

    let updated = h
        .market
        .lifecycle
        .override_status(&operator, &claim, ClaimStatus::Expired, now)
        .unwrap();
    assert_eq!(updated.status, ClaimStatus::Expired);
}

#[test]
fn commits_race_to_one_winner() {
    let h = Arc::new(Harness::new());
    let v = h.verifier("racer", 1.0, false);
    let claim = h.submit(5);
    h.sweep();

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let h = Arc::clone(&h);
            let v = v.clone();
            let claim = claim.clone();
            std::thread::spawn(move || {
                h.market.coordinator.submit_commit(
                    &claim,
                    &v,
                    sha256(&[i]),
                    Timestamp::new(T0 + 1),
                )
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, ProtocolError::DuplicateCommit { .. })));
}

#[test]
fn sweep_moves_a_claim_one_phase() {
    let h = Harness::new();
    let claim = h.submit(5);
    let report = h.sweep();
    assert_eq!(report.examined, 1);
    assert_eq!(report.advanced, 1);
    assert_eq!(h.status(&claim), ClaimStatus::CommitPhase);

    let events = h.market.lifecycle.drain_events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::PhaseChanged { .. }))
            .count(),
        1
    );
}

#[test]
fn interrupted_finalize_completes_on_next_sweep() {
    let h = Harness::new();
    let (claim, [a, b, c]) = reach_consensus(&h);
    h.clock.advance(2 * DAY);

    // The final flag flips, then the status write fails.
    h.store.fail_next(StoreOp::UpdateClaimStatus, 1);
    let report = h.sweep();
    assert_eq!(report.waiting, 1);
    assert_eq!(h.status(&claim), ClaimStatus::ConsensusReached);
    assert!(h.store.get_consensus_result(&claim).unwrap().unwrap().is_final);
    assert!(h.settlement.payouts().is_empty());
    assert_eq!(h.verification_count(&a), 0);

    let report = h.sweep();
    assert_eq!(report.advanced, 1);
    assert_eq!(h.status(&claim), ClaimStatus::Finalized);
    assert_eq!(h.paid_parties(), vec![a.clone(), b.clone()]);

    h.sweep();
    assert_eq!(h.settlement.payouts().len(), 2);
    for v in [&a, &b, &c] {
        assert_eq!(h.verification_count(v), 1);
    }
}

#[test]
fn failed_outcome_write_is_resumed_by_sweep() {
    let h = Harness::new();
    let (claim, [a, b, c]) = reach_consensus(&h);
    h.clock.advance(2 * DAY);

    h.store.fail_next(StoreOp::ApplyOutcome, 1);
    let err = h
        .market
        .lifecycle
        .finalize_claim(&claim, h.clock.now())
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(h.status(&claim), ClaimStatus::Finalized);
    for v in [&a, &b, &c] {
        assert_eq!(h.verification_count(v), 0);
    }
    assert!(h.settlement.payouts().is_empty());

    let report = h.sweep();
    assert_eq!(report.advanced, 1);
    for v in [&a, &b, &c] {
        assert_eq!(h.verification_count(v), 1);
    }
    assert_eq!(h.paid_parties(), vec![a.clone(), b.clone()]);

    h.sweep();
    h.market.lifecycle.process_payouts(&claim, h.clock.now()).unwrap();
    for v in [&a, &b, &c] {
        assert_eq!(h.verification_count(v), 1);
    }
    assert_eq!(h.settlement.payouts().len(), 2);
}

#[test]
fn unrecorded_payout_is_never_resent() {
    let h = Harness::new();
    let (claim, [a, b, _]) = reach_consensus(&h);
    h.clock.advance(2 * DAY);

    // Funds leave for `a`, then marking the record settled fails.
    h.store.fail_next(StoreOp::SettlePayout, 1);
    let report = h.sweep();
    assert_eq!(report.advanced, 1);
    assert_eq!(h.paid_parties(), vec![a.clone(), b.clone()]);

    let unconfirmed: Vec<_> = h
        .market
        .lifecycle
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            LifecycleEvent::PayoutUnconfirmed { verifier, amount, .. } => Some((verifier, amount)),
            _ => None,
        })
        .collect();
    assert_eq!(unconfirmed, vec![(a.clone(), Satoshis::new(4_900))]);

    for _ in 0..3 {
        h.sweep();
    }
    assert!(h
        .market
        .lifecycle
        .process_payouts(&claim, h.clock.now())
        .unwrap()
        .is_empty());
    assert_eq!(h.paid_parties(), vec![a.clone(), b.clone()]);

    let pending = h.store.get_payout(&claim, &a).unwrap().unwrap();
    assert_eq!(pending.state, PayoutState::Pending);
    assert_eq!(pending.settlement_ref, None);
    let settled = h.store.get_payout(&claim, &b).unwrap().unwrap();
    assert_eq!(settled.state, PayoutState::Settled);
    assert!(settled.settlement_ref.is_some());
}

#[test]
fn failed_reservation_is_retried_without_double_pay() {
    let h = Harness::new();
    let (claim, [a, b, _]) = reach_consensus(&h);
    h.clock.advance(2 * DAY);

    h.store.fail_next(StoreOp::ReservePayout, 1);
    h.sweep();
    assert_eq!(h.status(&claim), ClaimStatus::Finalized);
    assert_eq!(h.paid_parties(), vec![b.clone()]);
    assert!(h.store.get_payout(&claim, &a).unwrap().is_none());

    let report = h.sweep();
    assert_eq!(report.advanced, 1);
    assert_eq!(h.paid_parties(), vec![a.clone(), b.clone()]);

    h.sweep();
    assert_eq!(h.settlement.payouts().len(), 2);
    assert!(h
        .store
        .list_payouts(&claim)
        .unwrap()
        .iter()
        .all(|p| p.is_settled()));
}
