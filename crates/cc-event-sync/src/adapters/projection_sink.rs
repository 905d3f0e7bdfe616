//! # Projection Sink
//!
//! Connects the polling loop to the projection store: the store already
//! guarantees idempotent, atomic batch application, so the adapter only
//! translates error kinds.

use cc_projection::{ProjectionError, ProjectionStorage, ProjectionStore};
use shared_types::LedgerEvent;

use crate::ports::{EventSink, SinkError, SinkReport};

impl<S: ProjectionStorage> EventSink for ProjectionStore<S> {
    fn apply_events(&self, events: &[LedgerEvent]) -> Result<SinkReport, SinkError> {
        match ProjectionStore::apply_events(self, events) {
            Ok(batch) => Ok(SinkReport {
                applied: batch.applied,
                skipped: batch.skipped,
            }),
            Err(err @ ProjectionError::IntegrityViolation { .. }) => Err(SinkError::Integrity {
                detail: err.to_string(),
            }),
            Err(err) => Err(SinkError::Storage {
                message: err.to_string(),
            }),
        }
    }
}
