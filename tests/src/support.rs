//! # Test Fixtures
//!
//! A devnet in a box: simulated ledger, projection over in-memory
//! storage, and a reusable cursor, so tests can run the synchronizer in
//! short bursts and inspect both sides.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use cc_event_sync::{EventSynchronizer, MemoryCursorStore, SyncConfig};
use cc_ledger_client::{LedgerConnection, Operation, SimulatedLedger};
use cc_projection::{InMemoryStorage, ProjectionStore};
use shared_types::{Address, AssetMetadata, Hash, U256};

/// Deployer of the simulated ledger; holds all three roles.
pub const DEPLOYER: Address = Address::new([0xD0; 20]);

/// Short deterministic address.
#[must_use]
pub fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

/// Devnet asset metadata.
#[must_use]
pub fn metadata() -> AssetMetadata {
    AssetMetadata {
        commodity_type: "gold".to_string(),
        unit: "troy_oz".to_string(),
        total_quantity: 5_000,
        storage_location: "vault-zrh-1".to_string(),
        certification_hash: Hash::new([0xCE; 32]),
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

/// Polls a condition until it holds or a deadline passes.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..2_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached in time");
}

/// Ledger, mirror, and cursor wired together.
pub struct Devnet {
    /// The authoritative ledger.
    pub ledger: Arc<SimulatedLedger>,
    /// The local mirror.
    pub projection: Arc<ProjectionStore<Arc<InMemoryStorage>>>,
    /// Durable cursor shared across synchronizer runs.
    pub cursor: Arc<MemoryCursorStore>,
}

impl Devnet {
    /// Fresh devnet with an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        let storage = Arc::new(InMemoryStorage::new());
        Self {
            ledger: Arc::new(SimulatedLedger::new(DEPLOYER, metadata())),
            projection: Arc::new(ProjectionStore::open(storage).unwrap()),
            cursor: Arc::new(MemoryCursorStore::new()),
        }
    }

    /// Convenience: submit as the deployer, panicking on rejection.
    pub async fn submit(&self, operation: Operation) {
        self.ledger.submit(DEPLOYER, operation).await.unwrap();
    }

    /// Convenience: submit as a given caller, panicking on rejection.
    pub async fn submit_as(&self, caller: Address, operation: Operation) {
        self.ledger.submit(caller, operation).await.unwrap();
    }

    /// Whitelists and funds one account in two submissions.
    pub async fn fund(&self, account: Address, amount: u64) {
        self.submit(Operation::AddToWhitelist { account }).await;
        self.submit(Operation::Mint {
            to: account,
            amount: U256::from(amount),
            reason: format!("receipt-{account}"),
        })
        .await;
    }

    /// Runs the synchronizer until the mirror catches the current head,
    /// then stops it cleanly. Reuses the devnet's durable cursor, so
    /// repeated calls behave like restarts.
    pub async fn sync_to_head(&self) {
        let head = self.ledger.head_block().await.unwrap();
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut sync = EventSynchronizer::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.projection),
            Arc::clone(&self.cursor),
            SyncConfig::for_testing(),
            stop_rx,
        );
        let status = sync.status_handle();
        let task = tokio::spawn(async move { sync.run().await });
        wait_for(|| status.snapshot().cursor.is_some_and(|c| c >= head)).await;
        stop_tx.send(true).unwrap();
        task.await.unwrap().unwrap();
    }
}

impl Default for Devnet {
    fn default() -> Self {
        Self::new()
    }
}
