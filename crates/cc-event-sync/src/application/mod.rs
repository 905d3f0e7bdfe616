//! Application layer: the polling loop service.

pub mod synchronizer;

pub use synchronizer::{EventSynchronizer, SyncStatusHandle};
