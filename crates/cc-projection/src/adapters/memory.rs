//! In-memory implementation of [`ProjectionStorage`] for testing.

use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::ports::{BatchOperation, ProjectionStorage, StorageError};

/// BTreeMap-backed store. Ordered keys make prefix scans trivial.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStorage {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, for test assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ProjectionStorage for InMemoryStorage {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn write_batch(&self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    entries.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let entries = self.entries.read();
        Ok(entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
