//! Canonical claim fingerprint.
//!
//! Two drafts that say the same thing about the same period, place and
//! category hash identically, whatever their casing, spacing or JSON field
//! order. Claim type and sources are descriptive metadata and are not part of
//! the fingerprint.

use crate::hash::sha256;
use serde_json::json;
use truthmarket_types::{ClaimDraft, Digest, TimeWindow};

/// Trim, lower-case and collapse internal whitespace runs to a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Compute the canonical hash of a claim draft.
///
/// The preimage is a JSON object with lexicographically sorted keys, so it is
/// a pure function of the normalized content.
pub fn canonical_claim_hash(draft: &ClaimDraft) -> Digest {
    let window = draft.time_window.as_ref().map(canonical_window);
    let jurisdiction = draft
        .jurisdiction
        .as_deref()
        .map(normalize_text)
        .filter(|j| !j.is_empty());

    // serde_json's default map is a BTreeMap: keys serialize sorted.
    let preimage = json!({
        "subject": normalize_text(&draft.subject),
        "predicate": normalize_text(&draft.predicate),
        "object": normalize_text(&draft.object),
        "time_window": window,
        "jurisdiction": jurisdiction,
        "category": draft.category.as_str(),
    });
    sha256(preimage.to_string().as_bytes())
}

fn canonical_window(window: &TimeWindow) -> serde_json::Value {
    json!({
        "start": window.start.map(|t| t.as_secs()),
        "end": window.end.map(|t| t.as_secs()),
        "as_of": window.as_of.map(|t| t.as_secs()),
    })
}
