use thiserror::Error;

use crate::storage::StoreError;
use crate::tables::TableRole;

/// Errors that abort a cleanup.
///
/// Failures of the optional steps never show up here; they are recorded in
/// the [`RemovalReport`](super::RemovalReport) instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CleanupError {
    #[error("No user ID provided")]
    EmptyUserId,
    #[error("Could not find {role} table")]
    TableNotFound { role: TableRole },
    #[error("User {user_id} not found in {table}")]
    UserNotFound { user_id: String, table: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CleanupError {
    /// True for the "nothing to clean up" failures: a missing table or user.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CleanupError::TableNotFound { .. }
                | CleanupError::UserNotFound { .. }
                | CleanupError::Store(StoreError::TableNotFound(_))
        )
    }
}

/// Result type for cleanup operations.
pub type Result<T> = std::result::Result<T, CleanupError>;
