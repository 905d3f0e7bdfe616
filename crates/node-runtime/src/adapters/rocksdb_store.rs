//! # RocksDB Storage Adapter
//!
//! Production implementation of the mirror's durable ports. One database,
//! two column families:
//!
//! - `mirror` - account, history, and metadata records (cc-projection)
//! - `cursor` - the ingestion checkpoint (cc-event-sync)
//!
//! Batch writes go through RocksDB's `WriteBatch`, which gives the
//! all-or-nothing semantics the projection's crash-safety argument needs.
//! `sync_writes` forces an fsync per write; leave it on outside tests.

use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;

use cc_event_sync::{CursorError, CursorStore};
use cc_projection::{BatchOperation, ProjectionStorage, StorageError};

/// Column family for projection records.
pub const CF_MIRROR: &str = "mirror";
/// Column family for the ingestion cursor.
pub const CF_CURSOR: &str = "cursor";

/// All column families used by the mirror node.
pub const COLUMN_FAMILIES: &[&str] = &[CF_MIRROR, CF_CURSOR];

/// The single key under which the cursor lives.
const CURSOR_KEY: &[u8] = b"ingested";

/// RocksDB tuning knobs.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory.
    pub path: String,
    /// Write buffer size in bytes.
    pub write_buffer_size: usize,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/custody-mirror".to_string(),
            write_buffer_size: 64 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (small buffers, no sync).
    #[must_use]
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed store implementing both durable ports.
pub struct RocksDbStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create the database with both column families.
    pub fn open(config: RocksDbConfig) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            StorageError::Io {
                message: format!("failed to open RocksDB: {e}"),
            }
        })?;

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    /// Open with default tuning at the given path.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let config = RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        };
        Self::open(config)
    }

    fn write_opts(&self) -> rocksdb::WriteOptions {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

impl ProjectionStorage for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let db = self.db.read();
        let cf = db.cf_handle(CF_MIRROR).ok_or_else(|| StorageError::Io {
            message: "missing mirror column family".to_string(),
        })?;
        db.get_cf(cf, key).map_err(|e| StorageError::Io {
            message: format!("RocksDB get failed: {e}"),
        })
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let db = self.db.write();
        let cf = db.cf_handle(CF_MIRROR).ok_or_else(|| StorageError::Io {
            message: "missing mirror column family".to_string(),
        })?;
        db.put_cf_opt(cf, key, value, &self.write_opts())
            .map_err(|e| StorageError::Io {
                message: format!("RocksDB put failed: {e}"),
            })
    }

    fn write_batch(&self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        let db = self.db.write();
        let cf = db.cf_handle(CF_MIRROR).ok_or_else(|| StorageError::Io {
            message: "missing mirror column family".to_string(),
        })?;

        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put_cf(cf, &key, &value),
                BatchOperation::Delete { key } => batch.delete_cf(cf, &key),
            }
        }

        db.write_opt(batch, &self.write_opts())
            .map_err(|e| StorageError::Io {
                message: format!("RocksDB batch write failed: {e}"),
            })
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let db = self.db.read();
        let cf = db.cf_handle(CF_MIRROR).ok_or_else(|| StorageError::Io {
            message: "missing mirror column family".to_string(),
        })?;

        let mut results = Vec::new();
        let iter = db.iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));
        for item in iter {
            match item {
                Ok((key, value)) => {
                    if !key.starts_with(prefix) {
                        break;
                    }
                    results.push((key.to_vec(), value.to_vec()));
                }
                Err(e) => {
                    return Err(StorageError::Io {
                        message: format!("RocksDB scan failed: {e}"),
                    });
                }
            }
        }
        Ok(results)
    }
}

impl CursorStore for RocksDbStore {
    fn load(&self) -> Result<Option<u64>, CursorError> {
        let db = self.db.read();
        let cf = db.cf_handle(CF_CURSOR).ok_or_else(|| CursorError::Io {
            message: "missing cursor column family".to_string(),
        })?;
        let bytes = db.get_cf(cf, CURSOR_KEY).map_err(|e| CursorError::Io {
            message: format!("RocksDB cursor read failed: {e}"),
        })?;
        match bytes {
            None => Ok(None),
            Some(raw) => {
                let arr: [u8; 8] = raw.as_slice().try_into().map_err(|_| CursorError::Io {
                    message: format!("cursor record has {} bytes, expected 8", raw.len()),
                })?;
                Ok(Some(u64::from_be_bytes(arr)))
            }
        }
    }

    fn store(&self, cursor: u64) -> Result<(), CursorError> {
        let db = self.db.write();
        let cf = db.cf_handle(CF_CURSOR).ok_or_else(|| CursorError::Io {
            message: "missing cursor column family".to_string(),
        })?;
        db.put_cf_opt(cf, CURSOR_KEY, cursor.to_be_bytes(), &self.write_opts())
            .map_err(|e| CursorError::Io {
                message: format!("RocksDB cursor write failed: {e}"),
            })
    }
}
