use proptest::prelude::*;
use std::sync::Arc;

use truthmarket_reputation::ReputationLedger;
use truthmarket_store::MemoryStore;
use truthmarket_types::{ClaimCategory, ClaimId, ReputationParams, Timestamp, VerifierId};

proptest! {
    /// No sequence of outcomes or decays moves a score outside its bounds,
    /// and accuracy stays a probability.
    #[test]
    fn scores_stay_bounded(
        steps in prop::collection::vec((any::<bool>(), 0.0f64..=1.0, any::<bool>(), 0u32..24), 1..60),
    ) {
        let params = ReputationParams::default();
        let ledger = ReputationLedger::new(Arc::new(MemoryStore::new()), params.clone());
        let id = VerifierId::new("v");
        ledger
            .register_verifier(id.clone(), [ClaimCategory::Science], Timestamp::new(0))
            .unwrap();

        for (i, (correct, confidence, expert, months)) in steps.into_iter().enumerate() {
            let category = if expert { ClaimCategory::Science } else { ClaimCategory::Sports };
            let claim = ClaimId::new(format!("c{i}"));
            let v = ledger
                .record_outcome(&claim, &id, correct, confidence, category, Timestamp::new(i as u64))
                .unwrap();
            prop_assert!(v.reputation_score >= params.min_reputation);
            prop_assert!(v.reputation_score <= params.max_reputation);
            prop_assert!((0.0..=1.0).contains(&v.calibrated_accuracy));

            let v = ledger.apply_decay(&id, months).unwrap();
            prop_assert!(v.reputation_score >= params.min_reputation);
            prop_assert!(v.reputation_score <= params.max_reputation);
        }
    }
}
