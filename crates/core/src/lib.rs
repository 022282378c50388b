//! usercleanup_core - pure data and logic for the test-user cleanup tool.
//!
//! Nothing in this crate talks to AWS. The store is reached through the
//! [`storage::RecordStore`] trait so the cleanup flow can run against the
//! in-memory store in tests and against DynamoDB in the binary.

pub mod cleanup;
pub mod storage;
pub mod tables;
