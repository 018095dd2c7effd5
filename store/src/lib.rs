//! Abstract storage traits for the TruthMarket protocol.
//!
//! Every storage backend implements these traits. The rest of the codebase
//! depends only on the traits; [`MemoryStore`] is the in-process backend
//! used by tests and the reference daemon.

pub mod claim;
pub mod consensus;
pub mod error;
pub mod memory;
pub mod verification;
pub mod verifier;

pub use claim::ClaimStore;
pub use consensus::ConsensusStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use verification::VerificationStore;
pub use verifier::VerifierStore;

/// Everything the claim lifecycle needs from persistence.
pub trait MarketStore: ClaimStore + VerificationStore + ConsensusStore + VerifierStore {}

impl<T> MarketStore for T where T: ClaimStore + VerificationStore + ConsensusStore + VerifierStore {}
