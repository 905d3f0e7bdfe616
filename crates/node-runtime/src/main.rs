//! # Custody-Chain Mirror Node
//!
//! Composition root for the mirror engine. Owns every piece of
//! configuration and wiring; no component reaches global state.
//!
//! ## Startup Sequence
//!
//! 1. Initialize tracing (EnvFilter, `RUST_LOG` aware)
//! 2. Load configuration (JSON file argument, or defaults)
//! 3. Open the RocksDB mirror store (projection + cursor)
//! 4. Start the simulated devnet ledger
//! 5. Spawn the event synchronizer
//! 6. Drive the devnet issuance scenario through the submission client
//! 7. Report mirror state once converged, then poll until Ctrl-C
//!
//! ## Data Flow
//!
//! ```text
//! intents → state model (pre-validate) → ledger client → ledger
//!                                                          │ (poll)
//!            reads ← projection store ← event synchronizer ┘
//! ```

mod adapters;
mod config;
mod demo;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cc_event_sync::EventSynchronizer;
use cc_ledger_client::{LedgerConnection, SimulatedLedger};
use cc_projection::ProjectionStore;

use crate::adapters::{RocksDbConfig, RocksDbStore};
use crate::config::NodeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    info!(data_dir = %config.data_dir, "starting custody mirror node");

    // Durable store shared by the projection and the cursor.
    let store = Arc::new(
        RocksDbStore::open(RocksDbConfig {
            path: config.data_dir.clone(),
            ..Default::default()
        })
        .context("opening mirror database")?,
    );

    // Devnet: an in-process ledger stands in for the external chain.
    let ledger = Arc::new(SimulatedLedger::new(demo::OPERATOR, demo::asset_metadata()));

    let projection =
        Arc::new(ProjectionStore::open(Arc::clone(&store)).context("opening projection store")?);

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let mut synchronizer = EventSynchronizer::new(
        Arc::clone(&ledger),
        Arc::clone(&projection),
        Arc::clone(&store),
        config.sync.clone(),
        stop_rx,
    );
    let status = synchronizer.status_handle();
    let sync_task = tokio::spawn(async move { synchronizer.run().await });

    demo::run_issuance_scenario(&ledger, &config.submission).await?;

    // Wait (bounded) for the mirror to catch the ledger's head.
    let head = ledger.head_block().await.context("querying head block")?;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    loop {
        if status.snapshot().cursor == Some(head) {
            info!(head, "mirror converged");
            break;
        }
        if tokio::time::Instant::now() > deadline {
            warn!(head, status = ?status.snapshot(), "mirror did not converge before deadline");
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    demo::report_mirror(&projection);

    info!("polling continues; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;

    info!("shutdown requested");
    stop_tx.send(true).ok();
    sync_task
        .await
        .context("joining synchronizer task")?
        .context("synchronizer terminated abnormally")?;
    info!(final_status = ?status.snapshot(), "custody mirror node stopped");
    Ok(())
}
