//! Connection adapters. The simulated ledger backs the devnet runtime and
//! every integration test; production transports implement the same port.

pub mod simulated;

pub use simulated::SimulatedLedger;
