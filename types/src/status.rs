//! Claim phase state machine.
//!
//! The status field is the single source of truth for which coordinator
//! operations are legal. Only the transitions listed in
//! [`ClaimStatus::allowed_next`] can ever be applied.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimStatus {
    /// Registered, waiting for the commit phase to open.
    Pending,
    /// Verifiers may post commitments.
    CommitPhase,
    /// Committed verifiers may reveal.
    RevealPhase,
    /// A consensus result exists; the dispute window is running.
    ConsensusReached,
    /// Result is final and payouts have been issued.
    Finalized,
    /// A dispute was raised inside the dispute window.
    Disputed,
    /// The claim lapsed before a consensus could be formed.
    Expired,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::CommitPhase => "commit-phase",
            ClaimStatus::RevealPhase => "reveal-phase",
            ClaimStatus::ConsensusReached => "consensus-reached",
            ClaimStatus::Finalized => "finalized",
            ClaimStatus::Disputed => "disputed",
            ClaimStatus::Expired => "expired",
        }
    }

    /// The transition table.
    pub fn allowed_next(&self) -> &'static [ClaimStatus] {
        use ClaimStatus::*;
        match self {
            Pending => &[CommitPhase, Expired],
            CommitPhase => &[RevealPhase, Expired],
            RevealPhase => &[ConsensusReached, Expired],
            ConsensusReached => &[Finalized, Disputed],
            Finalized | Disputed | Expired => &[],
        }
    }

    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Validate a transition, returning the new status.
    pub fn transition(self, next: ClaimStatus) -> Result<ClaimStatus, TypesError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TypesError::IllegalTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
