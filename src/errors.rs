use thiserror::Error;
use uuid::Uuid;

/// Error type that captures common ledger and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Duplicate entry id: {0}")]
    DuplicateEntry(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
