//! Verifier reputation for the TruthMarket protocol.
//!
//! - [`math`]: pure update, decay and evidence-quality formulas
//! - [`collusion`]: pluggable detectors returning additive suspicion scores
//! - [`ledger`]: the store-backed ledger that applies them

pub mod collusion;
pub mod error;
pub mod ledger;
pub mod math;

pub use collusion::{CollusionDetector, SuspicionScores, UnanimityDetector};
pub use error::ReputationError;
pub use ledger::{ReputationAttestation, ReputationLedger};
