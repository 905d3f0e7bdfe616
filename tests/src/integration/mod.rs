//! Cross-crate integration suites.

mod conservation;
mod crash_recovery;
mod scenarios;
mod sync_flows;
