//! # Storage Port
//!
//! Durable keyed storage behind the projection. Any store with atomic
//! batch writes and prefix iteration suffices; RocksDB in production, a
//! hash map in tests.

use thiserror::Error;

/// Storage-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Underlying store I/O failure.
    #[error("storage I/O failure: {message}")]
    Io {
        /// Store-reported detail.
        message: String,
    },
}

/// One write in an atomic batch.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    /// Insert or overwrite a key.
    Put {
        /// Key bytes.
        key: Vec<u8>,
        /// Value bytes.
        value: Vec<u8>,
    },
    /// Remove a key.
    Delete {
        /// Key bytes.
        key: Vec<u8>,
    },
}

/// Durable keyed store abstraction.
pub trait ProjectionStorage: Send + Sync {
    /// Point lookup.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Single write.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// All-or-nothing application of a batch. The crash-safety argument
    /// of the whole mirror rests on this being atomic and durable.
    fn write_batch(&self, operations: Vec<BatchOperation>) -> Result<(), StorageError>;

    /// Every (key, value) pair whose key starts with `prefix`.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError>;
}

impl<T: ProjectionStorage + ?Sized> ProjectionStorage for std::sync::Arc<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn write_batch(&self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        (**self).write_batch(operations)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        (**self).prefix_scan(prefix)
    }
}
