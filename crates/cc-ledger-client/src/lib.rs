//! # CC Ledger Client
//!
//! Thin, stateless facade over the external custody ledger's read and
//! write surface.
//!
//! ## Purpose
//!
//! The ledger is an already-deployed, immutable state machine reached over
//! an unreliable, rate-limited RPC transport. This crate owns everything
//! about talking to it:
//!
//! - the [`LedgerConnection`] port the rest of the core consumes
//! - typed [`Operation`]s and [`Receipt`]s for the write surface
//! - structured [`ClientError`] kinds, so no caller ever classifies
//!   failures by matching a node's error text
//! - the [`SubmissionClient`] write policy: transport retry with backoff,
//!   and a confirmation deadline that reports *outcome unknown*
//! - a [`SimulatedLedger`] adapter enforcing the real transition rules,
//!   used by the devnet runtime and the test suites
//!
//! ## Module Structure
//!
//! ```text
//! cc-ledger-client/
//! ├── domain/          # Operation, Receipt, Submission, ClientError
//! ├── ports/           # LedgerConnection trait
//! ├── adapters/        # SimulatedLedger
//! └── application/     # SubmissionClient + SubmissionConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use adapters::SimulatedLedger;
pub use application::{SubmissionClient, SubmissionConfig};
pub use domain::{ClientError, Operation, Receipt, Submission};
pub use ports::LedgerConnection;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
