//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `usercleanup_core::storage`.
//! Throttling and service-side failures are transient; everything else the
//! remover cannot recover from is unexpected.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::list_tables::ListTablesError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use usercleanup_core::storage::StoreError;

/// Map a ListTables SDK error to StoreError.
pub fn map_list_tables_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ListTablesError, R>,
) -> StoreError {
    match err.into_service_error() {
        ListTablesError::InternalServerError(_) => {
            StoreError::Transient("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unexpected(format!("ListTables failed: {}", DisplayErrorContext(&err))),
    }
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Transient("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            StoreError::Transient("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            StoreError::Transient("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unexpected(format!("GetItem failed: {}", DisplayErrorContext(&err))),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => {
            StoreError::TableNotFound(table.to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Transient("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::Transient("Request limit exceeded, please retry".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            StoreError::Transient("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::Transient("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unexpected(format!("DeleteItem failed: {}", DisplayErrorContext(&err))),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::Transient("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::Transient("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::Transient("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unexpected(format!("Scan failed: {}", DisplayErrorContext(&err))),
    }
}
