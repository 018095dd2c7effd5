use proptest::prelude::*;
use std::collections::BTreeMap;
use truthmarket_types::{
    Claim, ClaimCategory, ClaimDraft, ClaimId, ClaimType, Digest, MarketParams, ReputationParams,
    Satoshis, Timestamp, Verdict, Verification, Verifier, VerifierId,
};
use truthmarket_verification::{payout_shares, reward_pool, ConsensusAggregator};

fn verdict() -> impl Strategy<Value = Verdict> {
    prop::sample::select(Verdict::ALL.to_vec())
}

fn reveals() -> impl Strategy<Value = Vec<Verification>> {
    prop::collection::vec((verdict(), 0.1f64..10.0), 1..20).prop_map(|votes| {
        votes
            .into_iter()
            .enumerate()
            .map(|(i, (verdict, reputation))| Verification {
                claim_id: ClaimId::new("c1"),
                verifier: VerifierId::new(format!("v{i:02}")),
                verdict,
                confidence: 0.7,
                evidence: Vec::new(),
                evidence_root: None,
                commitment_hash: Digest::ZERO,
                reputation_at_reveal: reputation,
                revealed_at: Timestamp::new(1),
            })
            .collect()
    })
}

fn claim() -> Claim {
    let draft = ClaimDraft {
        claim_type: ClaimType::Statistical,
        subject: "unemployment".into(),
        predicate: "fell below".into(),
        object: "4%".into(),
        time_window: None,
        jurisdiction: None,
        category: ClaimCategory::Politics,
        bounty: Satoshis::new(1_000),
        stake: Satoshis::new(1),
        deadline: Timestamp::new(1_000),
        sources: Vec::new(),
    };
    Claim::from_draft(
        ClaimId::new("c1"),
        VerifierId::new("s"),
        Digest::ZERO,
        draft,
        Timestamp::new(0),
    )
}

proptest! {
    #[test]
    fn payouts_never_exceed_pool(bounty in 0u64..10_000_000, reveals in reveals(), winning in verdict()) {
        let pool = reward_pool(Satoshis::new(bounty), &MarketParams::default());
        prop_assert!(pool <= Satoshis::new(bounty));
        let shares = payout_shares(pool, winning, &reveals);
        let total: u64 = shares.iter().map(|s| s.amount.raw()).sum();
        prop_assert!(total <= pool.raw());
        prop_assert!(shares.len() <= reveals.iter().filter(|r| r.verdict == winning).count());
    }

    #[test]
    fn consensus_is_deterministic_and_bounded(reveals in reveals()) {
        let verifiers: BTreeMap<VerifierId, Verifier> = reveals
            .iter()
            .map(|r| {
                let v = Verifier::new(
                    r.verifier.clone(),
                    r.reputation_at_reveal,
                    0.5,
                    Vec::<ClaimCategory>::new(),
                    Timestamp::new(0),
                );
                (v.id.clone(), v)
            })
            .collect();
        let market = MarketParams { min_quorum: 1, ..MarketParams::default() };
        let agg = ConsensusAggregator::new(&market, &ReputationParams::default());

        let first = agg.calculate(&claim(), &reveals, &verifiers, Timestamp::new(5)).unwrap();
        let mut reversed = reveals.clone();
        reversed.reverse();
        let second = agg.calculate(&claim(), &reversed, &verifiers, Timestamp::new(5)).unwrap();

        prop_assert_eq!(first.verdict, second.verdict);
        prop_assert_eq!(&first.participating_verifiers, &second.participating_verifiers);
        prop_assert!(first.confidence > 0.0 && first.confidence <= 1.0);
        prop_assert!(reveals.iter().any(|r| r.verdict == first.verdict));
    }
}
