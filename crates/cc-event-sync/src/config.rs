//! # Synchronizer Configuration
//!
//! Owned by the process's composition root and passed to the constructor;
//! nothing here is reachable through global lookup.

use serde::{Deserialize, Serialize};

/// Where ingestion starts when no durable cursor exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartMode {
    /// Start at the ledger's current head. New deployments skip history.
    Head,
    /// Backfill every block from the given one onward.
    Genesis(u64),
}

/// Polling-loop knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Delay between polls when the loop is healthy, in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum blocks fetched per window. Bounded to stay under the
    /// transport's per-request result-size limits.
    pub window_size: u64,

    /// First backoff delay after a transport failure, in milliseconds.
    /// Doubles per consecutive failure.
    pub backoff_base_ms: u64,

    /// Backoff ceiling, in milliseconds.
    pub backoff_max_ms: u64,

    /// Cold-start behavior when no cursor is stored.
    pub start: StartMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            window_size: 1_000,
            backoff_base_ms: 1_000,
            backoff_max_ms: 60_000,
            start: StartMode::Head,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (tight timings, tiny windows).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            poll_interval_ms: 10,
            window_size: 4,
            backoff_base_ms: 5,
            backoff_max_ms: 40,
            start: StartMode::Genesis(0),
        }
    }
}
