//! Cryptographic primitives for the TruthMarket protocol.
//!
//! - **SHA-256** for claim fingerprints, vote commitments and Merkle nodes
//! - **Canonical claim hash** over normalized claim content (deduplication)
//! - **Commit-reveal commitments** binding a hidden verdict to a secret nonce
//! - **Merkle trees** over evidence bundles, with index-addressed inclusion proofs
//! - **Ed25519** signature capability for authenticating verifier requests

pub mod canonical;
pub mod commitment;
pub mod error;
pub mod hash;
pub mod keys;
pub mod merkle;
pub mod sign;

pub use canonical::{canonical_claim_hash, normalize_text};
pub use commitment::{compute_commitment, generate_nonce};
pub use error::ProofError;
pub use hash::{sha256, sha256_multi};
pub use keys::KeyPair;
pub use merkle::{leaf_hash, node_hash, verify_proof, MerkleTree, ProofStep, Side};
pub use sign::{Ed25519Validator, SignatureValidator};
