//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting DynamoDB items into [`Record`]s. These are
//! testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use usercleanup_core::storage::Record;

/// Convert a DynamoDB item to a Record, keeping only string attributes.
pub fn item_to_record(item: &HashMap<String, AttributeValue>) -> Record {
    item.iter()
        .filter_map(|(name, value)| {
            value
                .as_s()
                .ok()
                .map(|s| (name.clone(), s.to_string()))
        })
        .collect()
}

/// Get the string key of an item.
pub fn key_value(item: &HashMap<String, AttributeValue>, key_attribute: &str) -> Option<String> {
    item.get(key_attribute)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Build the attribute value for a string key.
pub fn key_attribute_value(key: &str) -> AttributeValue {
    AttributeValue::S(key.to_string())
}

/// Start name for the next `ListTables` page, `None` once the last page is read.
pub fn next_table_page(last_evaluated_table_name: Option<String>) -> Option<String> {
    last_evaluated_table_name.filter(|name| !name.is_empty())
}

/// Start key for the next `Scan` page, `None` once the last page is read.
///
/// An empty `LastEvaluatedKey` also ends the scan.
pub fn next_scan_page(
    last_evaluated_key: Option<HashMap<String, AttributeValue>>,
) -> Option<HashMap<String, AttributeValue>> {
    last_evaluated_key.filter(|key| !key.is_empty())
}
