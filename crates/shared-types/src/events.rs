//! # Ledger Event Types
//!
//! Typed event records extracted from the ledger's log. One tagged variant
//! per event kind, each carrying only its relevant fields; payload shapes
//! are never stringly-typed or duck-typed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{Address, AssetMetadata, Hash, Role, U256};

// =============================================================================
// EVENT KIND
// =============================================================================

/// Discriminant for every event the ledger can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Token movement between two accounts.
    Transfer,
    /// New units issued against custody receipts.
    Mint,
    /// Units destroyed on redemption.
    Burn,
    /// Compliance whitelist flag changed for one account.
    WhitelistUpdated,
    /// Global compliance pause engaged.
    Paused,
    /// Global compliance pause released.
    Unpaused,
    /// Authorization role granted to an account.
    RoleGranted,
    /// Authorization role revoked from an account.
    RoleRevoked,
    /// Asset metadata replaced on the ledger.
    MetadataUpdated,
}

impl EventKind {
    /// Every kind the synchronizer must fetch per window.
    pub const ALL: &'static [EventKind] = &[
        EventKind::Transfer,
        EventKind::Mint,
        EventKind::Burn,
        EventKind::WhitelistUpdated,
        EventKind::Paused,
        EventKind::Unpaused,
        EventKind::RoleGranted,
        EventKind::RoleRevoked,
        EventKind::MetadataUpdated,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// =============================================================================
// EVENT PAYLOAD
// =============================================================================

/// Kind-specific event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// `Transfer(from, to, amount)`.
    Transfer {
        /// Sending account.
        from: Address,
        /// Receiving account.
        to: Address,
        /// Amount moved, in base units.
        amount: U256,
    },
    /// `Mint(to, amount, reason)`.
    Mint {
        /// Receiving account.
        to: Address,
        /// Amount issued, in base units.
        amount: U256,
        /// Custody reason string (e.g. receipt reference).
        reason: String,
    },
    /// `Burn(from, amount, reason)`.
    Burn {
        /// Account whose units are destroyed.
        from: Address,
        /// Amount destroyed, in base units.
        amount: U256,
        /// Redemption reason string.
        reason: String,
    },
    /// `WhitelistUpdated(account, status)`.
    WhitelistUpdated {
        /// Affected account.
        account: Address,
        /// New whitelist flag.
        status: bool,
    },
    /// Global pause engaged.
    Paused,
    /// Global pause released.
    Unpaused,
    /// `RoleGranted(role, account)`.
    RoleGranted {
        /// Granted role.
        role: Role,
        /// Receiving account.
        account: Address,
    },
    /// `RoleRevoked(role, account)`.
    RoleRevoked {
        /// Revoked role.
        role: Role,
        /// Affected account.
        account: Address,
    },
    /// Full metadata value replicated from the ledger.
    MetadataUpdated {
        /// The replacement metadata.
        metadata: AssetMetadata,
    },
}

impl EventPayload {
    /// Discriminant for this payload.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Transfer { .. } => EventKind::Transfer,
            EventPayload::Mint { .. } => EventKind::Mint,
            EventPayload::Burn { .. } => EventKind::Burn,
            EventPayload::WhitelistUpdated { .. } => EventKind::WhitelistUpdated,
            EventPayload::Paused => EventKind::Paused,
            EventPayload::Unpaused => EventKind::Unpaused,
            EventPayload::RoleGranted { .. } => EventKind::RoleGranted,
            EventPayload::RoleRevoked { .. } => EventKind::RoleRevoked,
            EventPayload::MetadataUpdated { .. } => EventKind::MetadataUpdated,
        }
    }

    /// The account an event is *about*, for deduplication identity.
    ///
    /// A single transaction may emit the same kind for several accounts
    /// (batch whitelist), so the subject participates in the identity key.
    /// Global events (pause, metadata) have no subject.
    #[must_use]
    pub fn subject(&self) -> Option<Address> {
        match self {
            EventPayload::Transfer { from, .. } => Some(*from),
            EventPayload::Mint { to, .. } => Some(*to),
            EventPayload::Burn { from, .. } => Some(*from),
            EventPayload::WhitelistUpdated { account, .. } => Some(*account),
            EventPayload::RoleGranted { account, .. } => Some(*account),
            EventPayload::RoleRevoked { account, .. } => Some(*account),
            EventPayload::Paused | EventPayload::Unpaused => None,
            EventPayload::MetadataUpdated { .. } => None,
        }
    }
}

// =============================================================================
// LEDGER EVENT
// =============================================================================

/// One immutable record from the ledger's event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Hash of the transaction that emitted this event.
    pub tx_hash: Hash,
    /// Block the transaction landed in.
    pub block_number: u64,
    /// Block timestamp (unix seconds).
    pub timestamp: u64,
    /// Intra-block emission order. Application order within a block is
    /// this index ascending.
    pub log_index: u32,
    /// Kind-specific payload.
    pub payload: EventPayload,
}

impl LedgerEvent {
    /// Deduplication identity for this event.
    #[must_use]
    pub fn id(&self) -> EventId {
        EventId {
            tx_hash: self.tx_hash,
            kind: self.payload.kind(),
            subject: self.payload.subject(),
        }
    }
}

/// Deduplication identity: (transaction hash, event kind, subject account).
///
/// Two events sharing a transaction hash but differing in kind, or in the
/// account they concern, are distinct records and must both be ingested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId {
    /// Emitting transaction.
    pub tx_hash: Hash,
    /// Event kind.
    pub kind: EventKind,
    /// Subject account, when the kind has one.
    pub subject: Option<Address>,
}

impl EventId {
    /// Stable byte encoding, usable as a storage key.
    #[must_use]
    pub fn to_key(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(32 + 1 + 20);
        key.extend_from_slice(self.tx_hash.as_bytes());
        key.push(self.kind as u8);
        if let Some(subject) = self.subject {
            key.extend_from_slice(subject.as_bytes());
        }
        key
    }
}
