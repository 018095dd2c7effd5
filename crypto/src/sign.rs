//! Verifier signature capability.
//!
//! Authenticates the caller of commit/reveal requests before they reach the
//! coordinator. The coordinator itself never inspects signatures.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use truthmarket_types::VerifierId;

/// Validates that `signature` over `message` was produced by `identity`.
pub trait SignatureValidator: Send + Sync {
    fn validate_signature(&self, message: &[u8], identity: &VerifierId, signature: &[u8]) -> bool;
}

/// Ed25519 validator. The identity is the hex-encoded 32-byte public key.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Validator;

impl SignatureValidator for Ed25519Validator {
    fn validate_signature(&self, message: &[u8], identity: &VerifierId, signature: &[u8]) -> bool {
        let Ok(key_bytes) = hex::decode(identity.as_str()) else {
            return false;
        };
        let Ok(key_bytes) = <[u8; 32]>::try_from(key_bytes.as_slice()) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        verifying_key.verify(message, &signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    #[test]
    fn sign_and_verify() {
        let kp = KeyPair::generate();
        let msg = b"commit claim-1";
        let sig = kp.sign(msg);
        assert!(Ed25519Validator.validate_signature(msg, &kp.identity(), &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = KeyPair::generate();
        let sig = kp.sign(b"correct message");
        assert!(!Ed25519Validator.validate_signature(b"wrong message", &kp.identity(), &sig));
    }

    #[test]
    fn wrong_identity_fails() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();
        let sig = kp1.sign(b"test");
        assert!(!Ed25519Validator.validate_signature(b"test", &kp2.identity(), &sig));
    }

    #[test]
    fn malformed_inputs_fail() {
        let kp = KeyPair::generate();
        let sig = kp.sign(b"test");
        assert!(!Ed25519Validator.validate_signature(b"test", &VerifierId::new("not-hex"), &sig));
        assert!(!Ed25519Validator.validate_signature(b"test", &VerifierId::new("abcd"), &sig));
        assert!(!Ed25519Validator.validate_signature(b"test", &kp.identity(), &sig[..10]));
    }
}
