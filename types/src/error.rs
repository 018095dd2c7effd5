//! Errors raised while constructing or parsing fundamental types.

use crate::status::ClaimStatus;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("unknown verdict: {0}")]
    UnknownVerdict(String),

    #[error("illegal status transition {from} -> {to}")]
    IllegalTransition { from: ClaimStatus, to: ClaimStatus },
}
