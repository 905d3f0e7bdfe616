//! # Shared Types Crate
//!
//! Domain entities, ledger event records, and the shared business-rule
//! error taxonomy used across the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-crate types are defined here.
//! - **Typed payloads**: every ledger event is a tagged variant carrying
//!   only its relevant fields; no dynamic payload shapes.
//! - **Exact arithmetic**: balances are `U256`, never floating point.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entities;
pub mod errors;
pub mod events;

pub use entities::{AccountState, Address, AssetMetadata, Hash, Role, U256};
pub use errors::{RuleError, TypeError};
pub use events::{EventId, EventKind, EventPayload, LedgerEvent};
