//! Ed25519 verifier key pairs.

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use truthmarket_types::VerifierId;

/// A verifier signing key together with its identity (hex public key).
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new key pair from a secure random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Derive a key pair from a 32-byte seed (deterministic).
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The verifier identity: hex-encoded Ed25519 public key.
    pub fn identity(&self) -> VerifierId {
        VerifierId::new(hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Sign a message, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}
