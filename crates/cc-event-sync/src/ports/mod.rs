//! # Synchronizer Ports
//!
//! Outbound dependencies of the polling loop: where events land and where
//! the cursor persists. Mock implementations for tests live alongside, as
//! do the port error kinds.

use parking_lot::Mutex;
use thiserror::Error;

use shared_types::LedgerEvent;

// =============================================================================
// EVENT SINK
// =============================================================================

/// Failure applying a batch to the sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Projected state would become impossible (negative balance or
    /// supply). Never absorbed.
    #[error("integrity violation: {detail}")]
    Integrity {
        /// Description for the operator.
        detail: String,
    },

    /// The sink's durable store failed.
    #[error("sink storage failure: {message}")]
    Storage {
        /// Store-reported detail.
        message: String,
    },
}

/// Counters from one batch application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// Events applied for the first time.
    pub applied: usize,
    /// Events skipped as already-ingested duplicates.
    pub skipped: usize,
}

/// Where ingested events land. Application must be idempotent per event
/// identity and atomic per batch.
pub trait EventSink: Send + Sync {
    /// Applies one ordered window of events.
    fn apply_events(&self, events: &[LedgerEvent]) -> Result<SinkReport, SinkError>;
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn apply_events(&self, events: &[LedgerEvent]) -> Result<SinkReport, SinkError> {
        (**self).apply_events(events)
    }
}

// =============================================================================
// CURSOR STORE
// =============================================================================

/// Failure reading or writing the durable cursor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// Underlying store I/O failure.
    #[error("cursor store failure: {message}")]
    Io {
        /// Store-reported detail.
        message: String,
    },
}

/// Durable record of the highest fully-ingested block.
///
/// Written strictly after the sink accepted the window; never advanced
/// past a block whose events are not yet durable.
pub trait CursorStore: Send + Sync {
    /// Last stored cursor, if any.
    fn load(&self) -> Result<Option<u64>, CursorError>;

    /// Persist a new cursor. Values are monotonically non-decreasing.
    fn store(&self, cursor: u64) -> Result<(), CursorError>;
}

impl<T: CursorStore + ?Sized> CursorStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<u64>, CursorError> {
        (**self).load()
    }

    fn store(&self, cursor: u64) -> Result<(), CursorError> {
        (**self).store(cursor)
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory cursor store.
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursor: Mutex<Option<u64>>,
}

impl MemoryCursorStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a cursor, simulating a restart.
    #[must_use]
    pub fn with_cursor(cursor: u64) -> Self {
        Self {
            cursor: Mutex::new(Some(cursor)),
        }
    }
}

impl CursorStore for MemoryCursorStore {
    fn load(&self) -> Result<Option<u64>, CursorError> {
        Ok(*self.cursor.lock())
    }

    fn store(&self, cursor: u64) -> Result<(), CursorError> {
        *self.cursor.lock() = Some(cursor);
        Ok(())
    }
}

/// Sink that records batches verbatim, for loop tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<LedgerEvent>>>,
    /// When set, the next application fails with this error.
    fail_next: Mutex<Option<SinkError>>,
}

impl RecordingSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch applied so far.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<LedgerEvent>> {
        self.batches.lock().clone()
    }

    /// Total events across all batches.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.batches.lock().iter().map(Vec::len).sum()
    }

    /// Makes the next application fail.
    pub fn fail_next(&self, error: SinkError) {
        *self.fail_next.lock() = Some(error);
    }
}

impl EventSink for RecordingSink {
    fn apply_events(&self, events: &[LedgerEvent]) -> Result<SinkReport, SinkError> {
        if let Some(error) = self.fail_next.lock().take() {
            return Err(error);
        }
        self.batches.lock().push(events.to_vec());
        Ok(SinkReport {
            applied: events.len(),
            skipped: 0,
        })
    }
}
