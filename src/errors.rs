use thiserror::Error;

/// Error type that captures common ledger failures.
///
/// `Validation` covers malformed commands (missing fields, non-positive
/// amounts) and is raised before any write. `Rejected` covers commands that
/// are well formed but break a business rule (overpayment, insufficient
/// bank funds). Neither leaves partial state behind.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
