//! # CC Projection
//!
//! The local, read-optimized mirror of ledger state.
//!
//! ## Purpose
//!
//! The mirror is built solely by replaying ingested ledger events; no
//! application write path touches account fields. After the cursor reaches
//! block N, mirrored balances, whitelist flags, and total supply equal the
//! authoritative ledger's state as of block N.
//!
//! ## Guarantees
//!
//! - **Idempotent replay**: every event carries a deduplication identity;
//!   re-applying an ingested window changes nothing.
//! - **Atomic windows**: a window persists as one storage batch before any
//!   in-memory view changes; a crash can only lose whole windows, which
//!   the cursor then re-fetches.
//! - **No silent corruption**: an event that would drive a balance or the
//!   supply negative halts ingestion with an integrity violation instead
//!   of clamping.
//!
//! ## Module Structure
//!
//! ```text
//! cc-projection/
//! ├── domain/          # AccountRecord, HistoryRecord, ProjectionStore
//! ├── ports/           # ProjectionStorage keyed-store trait
//! └── adapters/        # InMemoryStorage
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryStorage;
pub use domain::{AccountRecord, AppliedBatch, HistoryRecord, ProjectionError, ProjectionStore};
pub use ports::{BatchOperation, ProjectionStorage, StorageError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
