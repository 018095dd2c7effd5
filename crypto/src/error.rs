use thiserror::Error;

/// Merkle proof shape or lookup failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("evidence tree is empty; no proof is possible")]
    EmptyTree,

    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("proof has {actual} levels but the tree depth is {expected}")]
    DepthMismatch { expected: usize, actual: usize },

    #[error("evidence no longer hashes to the recorded root")]
    RootMismatch,
}
