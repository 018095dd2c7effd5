//! Claim registry: validation, canonical hashing and deduplication.

use crate::error::ProtocolError;
use crate::SharedStore;
use tracing::info;
use truthmarket_crypto::canonical_claim_hash;
use truthmarket_store::StoreError;
use truthmarket_types::{
    Claim, ClaimDraft, ClaimId, ClaimStatus, MarketParams, Timestamp, TimeWindow, VerifierId,
};

pub struct ClaimRegistry {
    store: SharedStore,
    params: MarketParams,
}

impl ClaimRegistry {
    pub fn new(store: SharedStore, params: MarketParams) -> Self {
        Self { store, params }
    }

    /// Validate and register a claim in `PENDING`.
    ///
    /// Semantically identical drafts collide on the canonical hash and are
    /// rejected with `DuplicateClaim`; the store's unique index settles races.
    pub fn submit_claim(
        &self,
        draft: ClaimDraft,
        submitter: VerifierId,
        now: Timestamp,
    ) -> Result<Claim, ProtocolError> {
        validate_draft(&draft, &self.params, now)?;

        let hash = canonical_claim_hash(&draft);
        if self.store.find_claim_by_hash(&hash)?.is_some() {
            return Err(ProtocolError::DuplicateClaim(hash));
        }

        let claim = Claim::from_draft(ClaimId::generate(), submitter, hash, draft, now);
        match self.store.insert_claim(&claim) {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => return Err(ProtocolError::DuplicateClaim(hash)),
            Err(e) => return Err(e.into()),
        }

        info!(
            claim = %claim.id,
            submitter = %claim.submitter,
            category = %claim.category,
            bounty = %claim.bounty,
            "claim registered"
        );
        Ok(claim)
    }

    pub fn get_claim(&self, id: &ClaimId) -> Result<Claim, ProtocolError> {
        self.store
            .get_claim(id)?
            .ok_or_else(|| ProtocolError::NotFound(format!("claim {id}")))
    }

    pub fn list_claims_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, ProtocolError> {
        Ok(self.store.list_claims_by_status(status)?)
    }
}

/// Structural checks on a draft before it is hashed or stored.
pub fn validate_draft(
    draft: &ClaimDraft,
    params: &MarketParams,
    now: Timestamp,
) -> Result<(), ProtocolError> {
    for (field, value) in [
        ("subject", &draft.subject),
        ("predicate", &draft.predicate),
        ("object", &draft.object),
    ] {
        if value.trim().is_empty() {
            return Err(ProtocolError::Validation(format!("{field} must not be empty")));
        }
    }
    if draft.bounty < params.min_bounty {
        return Err(ProtocolError::Validation(format!(
            "bounty {} below minimum {}",
            draft.bounty, params.min_bounty
        )));
    }
    if draft.stake < params.min_stake {
        return Err(ProtocolError::Validation(format!(
            "stake {} below minimum {}",
            draft.stake, params.min_stake
        )));
    }
    if draft.deadline <= now {
        return Err(ProtocolError::Validation(format!(
            "deadline {} is not in the future",
            draft.deadline
        )));
    }
    if let Some(window) = &draft.time_window {
        validate_time_window(window, now)?;
    }
    for source in &draft.sources {
        if source.url.trim().is_empty() {
            return Err(ProtocolError::Validation("source url must not be empty".into()));
        }
        if let Some(c) = source.credibility {
            if !(0.0..=1.0).contains(&c) {
                return Err(ProtocolError::Validation(format!(
                    "source credibility {c} outside [0, 1]"
                )));
            }
        }
    }
    Ok(())
}

fn validate_time_window(window: &TimeWindow, now: Timestamp) -> Result<(), ProtocolError> {
    if let Some(as_of) = window.as_of {
        if window.start.is_some() || window.end.is_some() {
            return Err(ProtocolError::Validation(
                "time window takes either as_of or start/end, not both".into(),
            ));
        }
        if as_of > now {
            return Err(ProtocolError::Validation(format!(
                "as_of {as_of} is in the future"
            )));
        }
    }
    if let (Some(start), Some(end)) = (window.start, window.end) {
        if start >= end {
            return Err(ProtocolError::Validation(format!(
                "time window start {start} is not before end {end}"
            )));
        }
    }
    Ok(())
}
