//! DynamoDB record store.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::debug;

use usercleanup_core::storage::{Record, RecordStore, Result, KEY_ATTRIBUTE};

use super::conversions::{
    item_to_record, key_attribute_value, key_value, next_scan_page, next_table_page,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_list_tables_error, map_scan_error,
};

/// DynamoDB-backed [`RecordStore`].
///
/// Every table is expected to use the string partition key [`KEY_ATTRIBUTE`]
/// and no sort key, which is how Amplify Gen 2 lays out model tables.
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordStore for DynamoDbStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut start_table: Option<String> = None;

        loop {
            let result = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start_table.take())
                .send()
                .await
                .map_err(map_list_tables_error)?;

            names.extend(result.table_names.unwrap_or_default());

            start_table = next_table_page(result.last_evaluated_table_name);
            if start_table.is_none() {
                break;
            }
        }

        debug!(count = names.len(), "Listed tables");
        Ok(names)
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Record>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .key(KEY_ATTRIBUTE, key_attribute_value(key))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table))?;

        Ok(result.item.as_ref().map(item_to_record))
    }

    async fn delete_item(&self, table: &str, key: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .key(KEY_ATTRIBUTE, key_attribute_value(key))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table))?;

        Ok(())
    }

    async fn scan_keys(&self, table: &str, attribute: &str, value: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut pages = 0usize;

        loop {
            let result = self
                .client
                .scan()
                .table_name(table)
                .filter_expression("#owner = :owner")
                .projection_expression("#key")
                .expression_attribute_names("#owner", attribute)
                .expression_attribute_names("#key", KEY_ATTRIBUTE)
                .expression_attribute_values(":owner", AttributeValue::S(value.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| map_scan_error(e, table))?;
            pages += 1;

            let items = result.items.unwrap_or_default();
            keys.extend(
                items
                    .iter()
                    .filter_map(|item| key_value(item, KEY_ATTRIBUTE)),
            );

            start_key = next_scan_page(result.last_evaluated_key);
            if start_key.is_none() {
                break;
            }
        }

        debug!(table, pages, matches = keys.len(), "Scanned table");
        Ok(keys)
    }
}
