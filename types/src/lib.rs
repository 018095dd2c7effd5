//! Fundamental types for the TruthMarket protocol.
//!
//! This crate defines the records shared across every other crate in the workspace:
//! identifiers, digests, amounts, timestamps, claims, verifiers, commitments,
//! reveals, consensus results and the protocol parameters.

pub mod amount;
pub mod claim;
pub mod consensus;
pub mod error;
pub mod hash;
pub mod ids;
pub mod params;
pub mod status;
pub mod time;
pub mod verdict;
pub mod verifier;
pub mod vote;

pub use amount::Satoshis;
pub use claim::{Claim, ClaimCategory, ClaimDraft, ClaimType, Source, TimeWindow};
pub use consensus::{ConsensusResult, Dispute, PayoutRecord, PayoutState};
pub use error::TypesError;
pub use hash::Digest;
pub use ids::{ClaimId, VerifierId};
pub use params::{MarketParams, ProtocolParams, ReputationParams};
pub use status::ClaimStatus;
pub use time::Timestamp;
pub use verdict::Verdict;
pub use verifier::Verifier;
pub use vote::{Commitment, Evidence, Verification};
