//! Reward split for a finalized claim.

use truthmarket_types::{MarketParams, Satoshis, Verdict, Verification, VerifierId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayoutShare {
    pub verifier: VerifierId,
    pub amount: Satoshis,
}

/// The bounty less the platform fee, floored to whole satoshis.
pub fn reward_pool(bounty: Satoshis, params: &MarketParams) -> Satoshis {
    let keep_bps = 10_000u128.saturating_sub(u128::from(params.platform_fee_bps));
    let pool = u128::from(bounty.raw()) * keep_bps / 10_000;
    Satoshis::new(u64::try_from(pool).unwrap_or(u64::MAX))
}

/// Split `pool` among the verifiers who revealed `winning` verdict, weighted
/// by their reputation at reveal time.
///
/// Shares are floored; the sum never exceeds the pool. Losing verifiers get
/// nothing here; stake forfeiture belongs to the settlement layer.
pub fn payout_shares(pool: Satoshis, winning: Verdict, reveals: &[Verification]) -> Vec<PayoutShare> {
    let winners: Vec<&Verification> = reveals.iter().filter(|r| r.verdict == winning).collect();
    let total: f64 = winners.iter().map(|r| r.reputation_at_reveal.max(0.0)).sum();
    if winners.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let mut remaining = pool;
    winners
        .into_iter()
        .map(|r| {
            let exact = pool.as_f64() * r.reputation_at_reveal.max(0.0) / total;
            let amount = Satoshis::from_f64_floor(exact).min(remaining);
            remaining = remaining.saturating_sub(amount);
            PayoutShare {
                verifier: r.verifier.clone(),
                amount,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthmarket_types::{ClaimId, Digest, Timestamp};

    fn reveal(verifier: &str, verdict: Verdict, reputation: f64) -> Verification {
        Verification {
            claim_id: ClaimId::new("c1"),
            verifier: VerifierId::new(verifier),
            verdict,
            confidence: 0.9,
            evidence: Vec::new(),
            evidence_root: None,
            commitment_hash: Digest::ZERO,
            reputation_at_reveal: reputation,
            revealed_at: Timestamp::new(0),
        }
    }

    #[test]
    fn pool_takes_two_percent() {
        let p = MarketParams::default();
        assert_eq!(reward_pool(Satoshis::new(10_000), &p), Satoshis::new(9_800));
        assert_eq!(reward_pool(Satoshis::new(99), &p), Satoshis::new(97));
    }

    #[test]
    fn winners_split_by_reputation() {
        let reveals = vec![
            reveal("a", Verdict::True, 2.0),
            reveal("b", Verdict::True, 2.0),
            reveal("c", Verdict::False, 1.0),
        ];
        let shares = payout_shares(Satoshis::new(9_800), Verdict::True, &reveals);
        assert_eq!(
            shares,
            vec![
                PayoutShare { verifier: VerifierId::new("a"), amount: Satoshis::new(4_900) },
                PayoutShare { verifier: VerifierId::new("b"), amount: Satoshis::new(4_900) },
            ]
        );
    }

    #[test]
    fn shares_are_floored() {
        let reveals = vec![
            reveal("a", Verdict::True, 1.0),
            reveal("b", Verdict::True, 1.0),
            reveal("c", Verdict::True, 1.0),
        ];
        let shares = payout_shares(Satoshis::new(100), Verdict::True, &reveals);
        assert!(shares.iter().all(|s| s.amount == Satoshis::new(33)));
    }

    #[test]
    fn no_winners_no_shares() {
        let reveals = vec![reveal("a", Verdict::False, 1.0)];
        assert!(payout_shares(Satoshis::new(100), Verdict::True, &reveals).is_empty());
    }
}
