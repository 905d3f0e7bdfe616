//! Port implementations owned by the composition root.

pub mod rocksdb_store;

pub use rocksdb_store::{RocksDbConfig, RocksDbStore};
