//! # Projection Records
//!
//! The denormalized shapes the mirror persists: one record per account,
//! one immutable history record per ingested event, and a small metadata
//! block.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use shared_types::{AccountState, Address, EventId, LedgerEvent, Role, U256};

/// Key prefixes in the durable store.
pub mod keys {
    /// Account records: `acct:` + 20 address bytes.
    pub const ACCOUNT: &[u8] = b"acct:";
    /// History records: `hist:` + event identity bytes.
    pub const HISTORY: &[u8] = b"hist:";
    /// Total supply.
    pub const SUPPLY: &[u8] = b"meta:supply";
    /// Global pause flag.
    pub const PAUSED: &[u8] = b"meta:paused";
    /// Replicated asset metadata.
    pub const ASSET: &[u8] = b"meta:asset";
}

/// Read-optimized copy of one account, keyed by address.
///
/// Only event replay writes these; no application path does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account address.
    pub address: Address,
    /// Mirrored balance in base units.
    pub balance: U256,
    /// Mirrored whitelist flag.
    pub whitelisted: bool,
    /// Mirrored role set.
    pub roles: BTreeSet<Role>,
}

impl AccountRecord {
    /// Fresh zero-balance record, materialized on first sighting.
    #[must_use]
    pub fn materialize(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    /// Storage key for this account.
    #[must_use]
    pub fn storage_key(address: &Address) -> Vec<u8> {
        let mut key = Vec::with_capacity(keys::ACCOUNT.len() + 20);
        key.extend_from_slice(keys::ACCOUNT);
        key.extend_from_slice(address.as_bytes());
        key
    }

    /// The ledger-shaped view of this record.
    #[must_use]
    pub fn as_state(&self) -> AccountState {
        AccountState {
            balance: self.balance,
            whitelisted: self.whitelisted,
            roles: self.roles.clone(),
        }
    }
}

/// One immutable, replay-safe history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Deduplication identity. Re-application of the same identity is a
    /// no-op.
    pub id: EventId,
    /// The ingested event, verbatim.
    pub event: LedgerEvent,
}

impl HistoryRecord {
    /// Wraps an event with its identity.
    #[must_use]
    pub fn from_event(event: LedgerEvent) -> Self {
        Self {
            id: event.id(),
            event,
        }
    }

    /// Storage key for this record.
    #[must_use]
    pub fn storage_key(id: &EventId) -> Vec<u8> {
        let mut key = Vec::with_capacity(keys::HISTORY.len() + 53);
        key.extend_from_slice(keys::HISTORY);
        key.extend_from_slice(&id.to_key());
        key
    }
}

/// Counters returned by one batch application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppliedBatch {
    /// Events applied for the first time.
    pub applied: usize,
    /// Events skipped as already-ingested duplicates.
    pub skipped: usize,
}
