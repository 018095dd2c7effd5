//! Claim verification core for the TruthMarket protocol.
//!
//! - [`claims`]: claim registry (validation, canonical hash, deduplication)
//! - [`commit_reveal`]: two-phase voting with commitment checks and evidence proofs
//! - [`consensus`]: reputation-weighted tally with a deterministic tie-break
//! - [`lifecycle`]: deadline-driven phase transitions, finalize, disputes, payouts
//! - [`market`]: wires the above over one store, ledger and lock table

pub mod auth;
pub mod claims;
pub mod commit_reveal;
pub mod consensus;
pub mod error;
pub mod lifecycle;
pub mod locks;
pub mod market;
pub mod payouts;

pub use auth::{AuthorizationPolicy, OperatorPolicy};
pub use claims::{validate_draft, ClaimRegistry};
pub use commit_reveal::{
    CommitReceipt, CommitRevealCoordinator, EvidenceProof, RevealReceipt, RevealRequest,
};
pub use consensus::ConsensusAggregator;
pub use error::ProtocolError;
pub use lifecycle::{LifecycleEvent, LifecycleManager, SweepReport};
pub use locks::ClaimLocks;
pub use market::TruthMarket;
pub use payouts::{payout_shares, reward_pool, PayoutShare};

use std::sync::Arc;
use truthmarket_store::MarketStore;

/// The store handle shared by every component.
pub type SharedStore = Arc<dyn MarketStore + Send + Sync>;
