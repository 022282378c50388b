//! DynamoDB backend for the cleanup.
//!
//! Implements [`usercleanup_core::storage::RecordStore`] on top of
//! `aws-sdk-dynamodb`.

mod client;
mod conversions;
mod error;
mod store;

pub use client::{create_client, AwsConfig, DEFAULT_REGION};
pub use store::DynamoDbStore;
