//! Domain layer: records, errors, and the store itself.

pub mod errors;
pub mod records;
pub mod store;

pub use errors::ProjectionError;
pub use records::{AccountRecord, AppliedBatch, HistoryRecord};
pub use store::ProjectionStore;
