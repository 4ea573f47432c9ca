use thiserror::Error;

/// Failure taxonomy for the account domain. All variants are synchronous,
/// typed outcomes; nothing here is retried.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required value was blank or malformed at the call site.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Email is already taken")]
    DuplicateEmail,

    #[error("User not found")]
    NotFound,

    /// Store-level failure, wrapped once and propagated unchanged.
    #[error("persistence failure: {0}")]
    Persistence(anyhow::Error),

    /// Hashing or signing failure. Surfaces as a generic 500 at the boundary.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AccountError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AccountError::InvalidArgument(msg.into())
    }
}
