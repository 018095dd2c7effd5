use proptest::prelude::*;

use truthmarket_types::{ClaimStatus, Digest, Satoshis, Timestamp};

fn any_status() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::Pending),
        Just(ClaimStatus::CommitPhase),
        Just(ClaimStatus::RevealPhase),
        Just(ClaimStatus::ConsensusReached),
        Just(ClaimStatus::Finalized),
        Just(ClaimStatus::Disputed),
        Just(ClaimStatus::Expired),
    ]
}

proptest! {
    /// Digest hex encoding is lossless.
    #[test]
    fn digest_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let d = Digest::new(bytes);
        prop_assert_eq!(Digest::from_hex(&d.to_hex()).unwrap(), d);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
        prop_assert_eq!(now.elapsed_since(t), 0);
    }

    /// has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(start in 0u64..1_000_000, dur in 0u64..1_000_000, now in 0u64..3_000_000) {
        let t = Timestamp::new(start);
        prop_assert_eq!(t.has_expired(dur, Timestamp::new(now)), now >= start + dur);
    }

    /// Floor conversion never rounds up.
    #[test]
    fn satoshi_floor_never_rounds_up(v in 0.0f64..1e15) {
        prop_assert!(Satoshis::from_f64_floor(v).as_f64() <= v);
    }

    /// Any sequence of legal transitions ends in a state it could reach, and
    /// nothing leaves a terminal state.
    #[test]
    fn transitions_respect_table(path in prop::collection::vec(any_status(), 0..10)) {
        let mut current = ClaimStatus::Pending;
        for next in path {
            match current.transition(next) {
                Ok(s) => {
                    prop_assert!(!current.is_terminal());
                    current = s;
                }
                Err(_) => prop_assert!(!current.can_transition_to(next)),
            }
        }
    }
}
