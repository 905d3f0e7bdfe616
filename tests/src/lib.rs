//! # Custody-Chain Test Suite
//!
//! Unified test crate covering the cross-crate properties of the mirror
//! engine.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Devnet fixture: ledger + projection + cursor
//! └── integration/
//!     ├── scenarios.rs       # End-to-end compliance flows
//!     ├── conservation.rs    # sum(balances) == totalSupply, always
//!     ├── crash_recovery.rs  # Cursor and replay semantics
//!     └── sync_flows.rs      # Transport faults, unknown outcomes
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::conservation::
//! ```

pub mod support;

mod integration;
