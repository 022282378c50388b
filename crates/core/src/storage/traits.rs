use async_trait::async_trait;

use super::{Record, Result};

/// The four store operations the cleanup flow consumes.
///
/// Keys are plain strings: the backend knows which attribute holds the key.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists every table name, in the order the backend reports them.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Gets a record by its key. Returns `None` when the key is absent.
    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Record>>;

    /// Deletes a record by its key. Deleting an absent key is not an error.
    async fn delete_item(&self, table: &str, key: &str) -> Result<()>;

    /// Scans the whole table and returns the keys of every record whose
    /// `attribute` equals `value`.
    async fn scan_keys(&self, table: &str, attribute: &str, value: &str) -> Result<Vec<String>>;
}
