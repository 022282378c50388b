use thiserror::Error;

/// Errors reported by a [`RecordStore`](super::RecordStore) backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    /// Throttling, request limits and service-side hiccups.
    #[error("Transient store error: {0}")]
    Transient(String),
    #[error("Unexpected store error: {0}")]
    Unexpected(String),
}

impl StoreError {
    /// Whether the same call could succeed if attempted later.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
