use thiserror::Error;

/// Error type that captures storage failures and recoverable ledger conditions.
///
/// `Io` and `Serde` are the only hard failures; every other variant is a
/// tagged outcome the caller surfaces as a user-visible message.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("cannot split an expense across zero members")]
    EmptyGroup,
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// True for conditions that should be reported to the user rather than
    /// treated as an internal failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::Io(_) | CoreError::Serde(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }
}
