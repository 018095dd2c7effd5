use thiserror::Error;
use truthmarket_store::StoreError;

#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("unknown verifier: {0}")]
    UnknownVerifier(String),

    #[error("verifier {0} is already registered")]
    AlreadyRegistered(String),

    #[error("attestation encoding failed: {0}")]
    Encoding(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
