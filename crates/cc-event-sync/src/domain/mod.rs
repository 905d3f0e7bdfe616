//! # Synchronizer Domain
//!
//! Loop phases, the observable status snapshot, and fatal error kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ports::{CursorError, SinkError};

/// The synchronizer's lifecycle.
///
/// ```text
/// STOPPED → INITIALIZING → POLLING ⇄ BACKOFF → STOPPED
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    /// Not running.
    Stopped,
    /// Loading or deriving the cursor.
    Initializing,
    /// Healthy polling.
    Polling,
    /// Waiting out a transport failure.
    Backoff,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Observable progress snapshot, for operators and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Current phase.
    pub phase: SyncPhase,
    /// Highest fully-ingested block, once known.
    pub cursor: Option<u64>,
    /// Highest head block seen on the ledger.
    pub head: u64,
    /// Windows applied since start.
    pub windows_applied: u64,
    /// Events newly applied since start.
    pub events_applied: u64,
    /// Events skipped as duplicates since start.
    pub events_skipped: u64,
    /// Transport failures since the last success.
    pub consecutive_failures: u32,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            phase: SyncPhase::Stopped,
            cursor: None,
            head: 0,
            windows_applied: 0,
            events_applied: 0,
            events_skipped: 0,
            consecutive_failures: 0,
        }
    }
}

/// Conditions that terminate the loop. Transport failures never appear
/// here; they are absorbed by backoff.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The sink refused a batch. An integrity violation is a modeling bug
    /// or a missed event; it always halts and always surfaces.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The durable cursor could not be read or written.
    #[error(transparent)]
    Cursor(#[from] CursorError),
}
