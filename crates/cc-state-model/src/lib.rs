//! # CC State Model
//!
//! In-process mirror of the external ledger's transition rules, used to
//! pre-validate intents before submission.
//!
//! ## Purpose
//!
//! The ledger re-validates every write itself; these checks exist solely to
//! catch predictably-failing operations locally instead of wasting a
//! round trip. A local pass followed by a remote failure is possible (a
//! race against a concurrent pause or whitelist change) and the remote
//! verdict is authoritative.
//!
//! ## Module Structure
//!
//! ```text
//! cc-state-model/
//! ├── ports.rs    # StateView read port + in-memory test view
//! └── rules.rs    # can_mint / can_burn / can_transfer / ...
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ports;
pub mod rules;

pub use ports::{InMemoryStateView, StateView};
pub use rules::{
    can_burn, can_change_role, can_mint, can_pause, can_set_whitelist, can_transfer, can_unpause,
    filter_whitelist_batch,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
