mod error;
#[cfg(any(test, feature = "inmemory"))]
mod inmemory;
mod traits;
mod types;

pub use error::{Result, StoreError};
#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryStore;
pub use traits::RecordStore;
pub use types::{Record, RecordSchema, KEY_ATTRIBUTE};
