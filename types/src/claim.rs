//! Claims: immutable factual assertions awaiting a verdict.

use crate::{ClaimId, ClaimStatus, Digest, Satoshis, Timestamp, VerifierId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimType {
    Statistical,
    Historical,
    Scientific,
    Medical,
    Financial,
    ProductPerformance,
    #[serde(rename = "legal/regulatory")]
    LegalRegulatory,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimCategory {
    Politics,
    Science,
    Business,
    Sports,
    Health,
    Technology,
    Environment,
    Other,
}

impl ClaimCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimCategory::Politics => "politics",
            ClaimCategory::Science => "science",
            ClaimCategory::Business => "business",
            ClaimCategory::Sports => "sports",
            ClaimCategory::Health => "health",
            ClaimCategory::Technology => "technology",
            ClaimCategory::Environment => "environment",
            ClaimCategory::Other => "other",
        }
    }
}

impl fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The period a claim speaks about: either a `[start, end)` range or a
/// point-in-time `as_of`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default)]
    pub start: Option<Timestamp>,
    #[serde(default)]
    pub end: Option<Timestamp>,
    #[serde(default)]
    pub as_of: Option<Timestamp>,
}

/// A cited source attached to a claim submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub title: String,
    pub content_hash: Digest,
    #[serde(default)]
    pub credibility: Option<f64>,
}

/// A claim as submitted, before validation and hashing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimDraft {
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    pub category: ClaimCategory,
    pub bounty: Satoshis,
    pub stake: Satoshis,
    pub deadline: Timestamp,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A registered claim.
///
/// Everything except `status` and `updated_at` is fixed at creation; the
/// canonical hash is computed once and never recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub submitter: VerifierId,
    pub claim_type: ClaimType,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub canonical_hash: Digest,
    pub time_window: Option<TimeWindow>,
    pub jurisdiction: Option<String>,
    pub category: ClaimCategory,
    pub bounty: Satoshis,
    pub stake: Satoshis,
    pub deadline: Timestamp,
    pub status: ClaimStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub sources: Vec<Source>,
}

impl Claim {
    /// Build a pending claim from a validated draft.
    pub fn from_draft(
        id: ClaimId,
        submitter: VerifierId,
        canonical_hash: Digest,
        draft: ClaimDraft,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            submitter,
            claim_type: draft.claim_type,
            subject: draft.subject,
            predicate: draft.predicate,
            object: draft.object,
            canonical_hash,
            time_window: draft.time_window,
            jurisdiction: draft.jurisdiction,
            category: draft.category,
            bounty: draft.bounty,
            stake: draft.stake,
            deadline: draft.deadline,
            status: ClaimStatus::Pending,
            created_at: now,
            updated_at: now,
            sources: draft.sources,
        }
    }

    /// When the current phase began. Every status change bumps `updated_at`.
    pub fn phase_started_at(&self) -> Timestamp {
        self.updated_at
    }
}
