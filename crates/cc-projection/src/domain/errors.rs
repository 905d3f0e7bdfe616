//! # Projection Errors

use shared_types::{Address, Hash};
use thiserror::Error;

use crate::ports::StorageError;

/// Failures on the projection's apply and load paths.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// An event would drive projected state somewhere the ledger cannot
    /// be: a negative balance or supply. Signals a missed or misordered
    /// event. Ingestion halts; nothing is clamped or dropped.
    #[error("integrity violation at tx {tx_hash:?}: {detail}")]
    IntegrityViolation {
        /// Account involved, when the violation concerns one.
        account: Option<Address>,
        /// Emitting transaction.
        tx_hash: Hash,
        /// Human-readable description for the operator.
        detail: String,
    },

    /// Durable store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A persisted record failed to decode on reload.
    #[error("corrupt record in storage: {0}")]
    Corrupt(String),
}
