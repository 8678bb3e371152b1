/// Error type for transaction runner operations
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Document-session failures from stores without a dedicated variant.
    #[error("Document session error: {0}")]
    Session(String),

    #[error("Transaction commit failed: {0}")]
    CommitFailed(String),

    /// For store implementations whose rollback can fail without a driver
    /// error. The runners only log rollback failures.
    #[error("Transaction rollback failed: {0}")]
    RollbackFailed(String),

    #[error("Transaction is no longer available to this handle")]
    TransactionClosed,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[cfg(feature = "mongodb")]
    #[error("Document store error: {0}")]
    DocumentStore(#[from] mongodb::error::Error),
}

/// Result type for transaction runner operations
pub type TransactionResult<T> = Result<T, TransactionError>;

/// Error type for the string and time helpers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UtilError {
    #[error("invalid base64 string")]
    InvalidBase64,

    #[error("decoded base64 is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid datetime layout: {0}")]
    InvalidLayout(String),
}
