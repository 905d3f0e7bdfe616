//! # Ledger Connection Port
//!
//! The read and write surface this core consumes from the external ledger.
//! Implementations are thin and stateless; retries, timeouts, and error
//! classification live in the facade layer, not behind this trait.

use async_trait::async_trait;
use shared_types::{AccountState, Address, AssetMetadata, EventKind, LedgerEvent};

use crate::domain::{ClientError, Operation, Receipt};

/// Connection to a ledger node.
///
/// Calls may time out, return stale data, or fail with node-specific
/// errors; callers must treat every method as fallible and eventually
/// consistent.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Current head block number.
    async fn head_block(&self) -> Result<u64, ClientError>;

    /// Events of one kind within an inclusive block range, in
    /// (block number, intra-block emission) order.
    async fn events_in_range(
        &self,
        from_block: u64,
        to_block: u64,
        kind: EventKind,
    ) -> Result<Vec<LedgerEvent>, ClientError>;

    /// Balance, whitelist flag, and roles for one account.
    async fn account_state(&self, address: &Address) -> Result<AccountState, ClientError>;

    /// Global compliance pause flag.
    async fn pause_status(&self) -> Result<bool, ClientError>;

    /// Current asset metadata.
    async fn metadata(&self) -> Result<AssetMetadata, ClientError>;

    /// Submit a write and wait for its receipt. The ledger serializes all
    /// writes; a successful return means the transaction landed.
    async fn submit(&self, caller: Address, operation: Operation) -> Result<Receipt, ClientError>;
}
