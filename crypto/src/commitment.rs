//! Commit-reveal commitments.
//!
//! A verifier commits to `H(verdict, confidence, evidence, nonce)` during the
//! commit phase and discloses the four fields during the reveal phase. Any
//! change to any field after committing changes the recomputed hash.

use crate::hash::sha256;
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::{json, Value};
use truthmarket_types::{Digest, Evidence, Verdict};

/// Compute the commitment hash for a hidden vote.
///
/// The preimage is a JSON array in the fixed order
/// `[verdict, confidence, evidence, nonce]`; each evidence item is an object
/// with sorted keys.
pub fn compute_commitment(
    verdict: Verdict,
    confidence: f64,
    evidence: &[Evidence],
    nonce: &str,
) -> Digest {
    let evidence: Vec<Value> = evidence.iter().map(evidence_value).collect();
    let preimage = json!([verdict.as_str(), confidence, evidence, nonce]);
    sha256(preimage.to_string().as_bytes())
}

fn evidence_value(e: &Evidence) -> Value {
    json!({
        "content_hash": e.content_hash.to_hex(),
        "url": e.url,
        "snapshot_pointer": e.snapshot_pointer,
        "content_type": e.content_type,
        "description": e.description,
        "credibility": e.credibility,
    })
}

/// Generate a fresh 256-bit nonce, hex-encoded.
///
/// The verifier must keep it secret until reveal.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256 as h;

    fn evidence(tag: &str) -> Evidence {
        Evidence {
            content_hash: h(tag.as_bytes()),
            url: Some(format!("https://example.org/{tag}")),
            snapshot_pointer: None,
            content_type: "text/html".into(),
            description: tag.into(),
            credibility: Some(0.8),
        }
    }

    #[test]
    fn deterministic() {
        let ev = vec![evidence("a")];
        assert_eq!(
            compute_commitment(Verdict::True, 0.9, &ev, "n1"),
            compute_commitment(Verdict::True, 0.9, &ev, "n1")
        );
    }

    #[test]
    fn every_field_is_bound() {
        let ev = vec![evidence("a"), evidence("b")];
        let base = compute_commitment(Verdict::True, 0.9, &ev, "n1");

        assert_ne!(base, compute_commitment(Verdict::MostlyTrue, 0.9, &ev, "n1"));
        assert_ne!(base, compute_commitment(Verdict::True, 0.91, &ev, "n1"));
        assert_ne!(base, compute_commitment(Verdict::True, 0.9, &ev[..1], "n1"));
        assert_ne!(base, compute_commitment(Verdict::True, 0.9, &ev, "n2"));

        let mut reordered = ev.clone();
        reordered.reverse();
        assert_ne!(base, compute_commitment(Verdict::True, 0.9, &reordered, "n1"));

        let mut edited = ev.clone();
        edited[0].description.push('!');
        assert_ne!(base, compute_commitment(Verdict::True, 0.9, &edited, "n1"));
    }

    #[test]
    fn nonces_are_fresh() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
