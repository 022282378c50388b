//! In-memory record store.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Record, RecordStore, Result, StoreError, KEY_ATTRIBUTE};

type Tables = BTreeMap<String, BTreeMap<String, Record>>;

/// In-memory storage backend for testing.
///
/// Tables are kept in a `BTreeMap`, so `list_tables` reports names in
/// alphabetical order the way DynamoDB does. Deletes and scans can be made to
/// fail per table, and every `delete_item` call is counted whether it succeeds
/// or not.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    failing_deletes: Arc<RwLock<HashSet<String>>>,
    failing_scans: Arc<RwLock<HashSet<String>>>,
    mutations: Arc<AtomicUsize>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store. Records are keyed on [`KEY_ATTRIBUTE`].
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(BTreeMap::new())),
            failing_deletes: Arc::new(RwLock::new(HashSet::new())),
            failing_scans: Arc::new(RwLock::new(HashSet::new())),
            mutations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a table. Existing tables are left untouched.
    pub async fn create_table(&self, name: &str) {
        let mut tables = self.tables.write().await;
        tables.entry(name.to_string()).or_default();
    }

    /// Inserts (or replaces) a record. Does not count as a mutation.
    pub async fn insert(&self, table: &str, record: Record) -> Result<()> {
        let key = record
            .get(KEY_ATTRIBUTE)
            .ok_or_else(|| {
                StoreError::Unexpected(format!("Record is missing key '{KEY_ATTRIBUTE}'"))
            })?
            .to_string();

        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        rows.insert(key, record);
        Ok(())
    }

    /// Whether `table` holds a record under `key`.
    pub async fn contains(&self, table: &str, key: &str) -> bool {
        let tables = self.tables.read().await;
        tables.get(table).is_some_and(|rows| rows.contains_key(key))
    }

    /// Number of records in `table` (0 when the table is missing).
    pub async fn len(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map_or(0, BTreeMap::len)
    }

    /// Makes every later `delete_item` on `table` fail with a transient error.
    pub async fn fail_deletes_in(&self, table: &str) {
        self.failing_deletes.write().await.insert(table.to_string());
    }

    /// Makes every later `scan_keys` on `table` fail with a transient error.
    pub async fn fail_scans_in(&self, table: &str) {
        self.failing_scans.write().await.insert(table.to_string());
    }

    /// Number of `delete_item` calls received so far.
    pub fn mutation_calls(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables.keys().cloned().collect())
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Record>> {
        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(rows.get(key).cloned())
    }

    async fn delete_item(&self, table: &str, key: &str) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);

        if self.failing_deletes.read().await.contains(table) {
            return Err(StoreError::Transient(format!(
                "Simulated delete failure in {table}"
            )));
        }

        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        rows.remove(key);
        Ok(())
    }

    async fn scan_keys(&self, table: &str, attribute: &str, value: &str) -> Result<Vec<String>> {
        if self.failing_scans.read().await.contains(table) {
            return Err(StoreError::Transient(format!(
                "Simulated scan failure in {table}"
            )));
        }

        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(rows
            .iter()
            .filter(|(_, record)| record.get(attribute) == Some(value))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_users() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.create_table("User-abc-NONE").await;
        store
            .insert("User-abc-NONE", Record::new().with("id", "user-1"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_list_tables_is_alphabetical() {
        let store = InMemoryStore::new();
        store.create_table("UserSubscription-abc-NONE").await;
        store.create_table("Essay-abc-NONE").await;
        store.create_table("User-abc-NONE").await;

        let tables = store.list_tables().await.unwrap();
        assert_eq!(
            tables,
            vec!["Essay-abc-NONE", "User-abc-NONE", "UserSubscription-abc-NONE"]
        );
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let store = store_with_users().await;

        let record = store.get_item("User-abc-NONE", "user-1").await.unwrap();
        assert!(record.is_some());

        store.delete_item("User-abc-NONE", "user-1").await.unwrap();
        assert!(!store.contains("User-abc-NONE", "user-1").await);
        assert_eq!(store.mutation_calls(), 1);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let store = store_with_users().await;

        let result = store.delete_item("User-abc-NONE", "nobody").await;
        assert!(result.is_ok());
        assert_eq!(store.len("User-abc-NONE").await, 1);
    }

    #[tokio::test]
    async fn test_get_from_missing_table() {
        let store = InMemoryStore::new();

        let result = store.get_item("Missing", "user-1").await;
        assert_eq!(result, Err(StoreError::TableNotFound("Missing".to_string())));
    }

    #[tokio::test]
    async fn test_insert_without_key_fails() {
        let store = store_with_users().await;

        let result = store
            .insert("User-abc-NONE", Record::new().with("email", "a@b.c"))
            .await;
        assert!(matches!(result, Err(StoreError::Unexpected(_))));
    }

    #[tokio::test]
    async fn test_failing_deletes_are_counted() {
        let store = store_with_users().await;
        store.fail_deletes_in("User-abc-NONE").await;

        let result = store.delete_item("User-abc-NONE", "user-1").await;
        assert!(matches!(result, Err(StoreError::Transient(_))));
        assert!(store.contains("User-abc-NONE", "user-1").await);
        assert_eq!(store.mutation_calls(), 1);
    }

    #[tokio::test]
    async fn test_scan_keys_filters_on_attribute() {
        let store = InMemoryStore::new();
        store.create_table("Essay-abc-NONE").await;
        for (id, owner) in [("e1", "user-1"), ("e2", "user-2"), ("e3", "user-1")] {
            store
                .insert(
                    "Essay-abc-NONE",
                    Record::new().with("id", id).with("userId", owner),
                )
                .await
                .unwrap();
        }

        let keys = store
            .scan_keys("Essay-abc-NONE", "userId", "user-1")
            .await
            .unwrap();
        assert_eq!(keys, vec!["e1", "e3"]);
    }

    #[tokio::test]
    async fn test_failing_scans() {
        let store = InMemoryStore::new();
        store.create_table("Essay-abc-NONE").await;
        store.fail_scans_in("Essay-abc-NONE").await;

        let result = store.scan_keys("Essay-abc-NONE", "userId", "user-1").await;
        assert!(matches!(result, Err(StoreError::Transient(_))));
    }
}
