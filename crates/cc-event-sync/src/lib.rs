//! # CC Event Sync
//!
//! Converges the local mirror to the ledger's event history over an
//! unreliable transport, without processing any event twice or
//! permanently skipping one.
//!
//! ## Approach
//!
//! Polling with a durable cursor is the primary path: push subscriptions
//! cannot guarantee gap-free delivery across reconnects, so if one is ever
//! added it may only pre-warm the same windowed, deduplicated path.
//!
//! - bounded windows: `[cursor+1, min(cursor+W, head)]`
//! - every event kind fetched per window, applied in (block, emission)
//!   order
//! - sink write durably lands before the cursor advances
//! - transport failures enter doubling backoff; only an explicit stop or
//!   an integrity violation terminates the loop
//!
//! ## Module Structure
//!
//! ```text
//! cc-event-sync/
//! ├── config.rs        # SyncConfig, StartMode
//! ├── domain/          # SyncPhase, SyncStatus, SyncError
//! ├── ports/           # EventSink + CursorStore traits, mocks
//! ├── adapters/        # ProjectionStore sink adapter
//! └── application/     # EventSynchronizer
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{EventSynchronizer, SyncStatusHandle};
pub use config::{StartMode, SyncConfig};
pub use domain::{SyncError, SyncPhase, SyncStatus};
pub use ports::{CursorError, CursorStore, EventSink, MemoryCursorStore, SinkError, SinkReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
