use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The backend could not be reached; the call may be retried.
    #[error("settlement backend unavailable: {0}")]
    Unavailable(String),

    #[error("transfer rejected: {0}")]
    Rejected(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl SettlementError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SettlementError::Unavailable(_))
    }
}
