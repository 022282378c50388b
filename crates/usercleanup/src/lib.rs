//! usercleanup - delete a test user and the records it owns.
//!
//! The binary wires the [`usercleanup_core`] remover to DynamoDB, asks for
//! confirmation, and prints what happened.

pub mod cli;
pub mod dynamodb;
pub mod error;
pub mod prelude;
pub mod prompt;
pub mod session;

pub use error::{CliError, Result};
