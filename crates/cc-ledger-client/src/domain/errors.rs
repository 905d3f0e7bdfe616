//! # Client Errors
//!
//! Structured error kinds for ledger communication. Classification happens
//! here, at the facade, so nothing upstream ever matches on a node's error
//! text.

use shared_types::{Hash, RuleError};
use thiserror::Error;

/// Failures surfaced by the ledger client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transient RPC/network failure. Retryable with backoff.
    #[error("transport failure: {message}")]
    Transport {
        /// Node-reported detail, informational only.
        message: String,
    },

    /// A single request exceeded its deadline before the node answered.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// The elapsed deadline.
        timeout_ms: u64,
    },

    /// The confirmation window elapsed while waiting for a receipt. The
    /// write may still land later; the poller reconciles it. Not a failure.
    #[error("confirmation window elapsed; outcome unknown")]
    OutcomeUnknown {
        /// Transaction hash, when the node assigned one before the cutoff.
        tx_hash: Option<Hash>,
    },

    /// The ledger re-validated the write and rejected it. Authoritative;
    /// never retried.
    #[error("rejected by ledger: {0}")]
    Rejected(#[from] RuleError),

    /// The node answered with something the facade could not decode.
    #[error("malformed node response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether a retry with backoff can help.
    ///
    /// Only transient transport conditions qualify. An unknown outcome is
    /// deliberately not retryable: re-submitting could double-apply.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. } | ClientError::Timeout { .. }
        )
    }
}
