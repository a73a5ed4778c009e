//! Key-value persistence behind the ledger.
//!
//! The ledger stores a handful of JSON text records under fixed keys; a
//! backend only has to get, set and remove text by key.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::error::StoreResult;

pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or overwrite.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for std::sync::Arc<B> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
