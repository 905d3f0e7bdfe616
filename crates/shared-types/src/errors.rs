//! # Shared Error Types
//!
//! The business-rule taxonomy mirrors the ledger's own revert reasons.
//! These are expected outcomes surfaced verbatim to callers, never retried.

use thiserror::Error;

use crate::entities::{Address, Role, U256};

/// Transition-rule violations, identical locally and on the ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Caller lacks the required role.
    #[error("unauthorized: {caller:?} lacks {required}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
        /// Role the operation requires.
        required: Role,
    },

    /// Sender or recipient is not on the compliance whitelist.
    #[error("not whitelisted: {account:?}")]
    NotWhitelisted {
        /// The non-whitelisted party.
        account: Address,
    },

    /// Operation blocked by the global compliance pause.
    #[error("ledger is paused")]
    Paused,

    /// Balance too low for the requested amount.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Amount the operation needs.
        required: U256,
        /// Amount actually held.
        available: U256,
    },

    /// Amount must be strictly positive.
    #[error("invalid amount: must be positive")]
    InvalidAmount,

    /// Duplicate pause/unpause toggle.
    #[error("already in requested state")]
    AlreadyInState,
}

/// Parse/shape failures for shared value objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Not a valid 20-byte hex address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Not a valid 32-byte hex hash.
    #[error("invalid hash: {0}")]
    InvalidHash(String),
}
