//! Error types for the command line shell.

use thiserror::Error;

/// Result type alias for the shell.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that stop a session before the cleanup outcome is known.
///
/// A failed cleanup is not an error here: it is reported through
/// [`SessionOutcome::Failed`](crate::session::SessionOutcome::Failed).
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Could not read answer: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Prompt(err.to_string())
    }
}
