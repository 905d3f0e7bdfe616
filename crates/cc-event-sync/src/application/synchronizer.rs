//! # Event Synchronizer
//!
//! One sequential polling worker converging the sink to the ledger's
//! event history. Windows are bounded, applied in order, and checkpointed
//! durably; parallel window processing would reintroduce the ordering
//! problem this loop exists to avoid.
//!
//! ## Crash safety
//!
//! The sink write always lands before the cursor advances. A crash
//! mid-window leaves the cursor behind, so the same window is re-fetched
//! on restart and re-applied idempotently.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;

use cc_ledger_client::{ClientError, LedgerConnection};
use shared_types::EventKind;

use crate::config::{StartMode, SyncConfig};
use crate::domain::{SyncError, SyncPhase, SyncStatus};
use crate::ports::{CursorStore, EventSink};

/// Doubling backoff, capped. Failures count from 1.
fn compute_backoff(failures: u32, base_ms: u64, max_ms: u64) -> Duration {
    let factor = 1u64 << failures.saturating_sub(1).min(16);
    Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
}

/// Cloneable view of the loop's progress.
#[derive(Clone)]
pub struct SyncStatusHandle {
    inner: Arc<RwLock<SyncStatus>>,
}

impl SyncStatusHandle {
    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SyncStatus {
        *self.inner.read()
    }
}

/// Outcome of one poll attempt.
enum PollFailure {
    /// Transport trouble; back off and try again.
    Transient(ClientError),
    /// Halt the loop and surface.
    Fatal(SyncError),
}

/// The polling loop. Generic over the connection, the sink, and the
/// cursor store so tests can swap any of the three.
pub struct EventSynchronizer<L, K, C> {
    ledger: Arc<L>,
    sink: Arc<K>,
    cursor_store: C,
    config: SyncConfig,
    stop_rx: watch::Receiver<bool>,
    status: Arc<RwLock<SyncStatus>>,
}

impl<L, K, C> EventSynchronizer<L, K, C>
where
    L: LedgerConnection,
    K: EventSink,
    C: CursorStore,
{
    /// Builds a synchronizer. The stop channel belongs to the composition
    /// root; sending `true` halts the loop between windows.
    pub fn new(
        ledger: Arc<L>,
        sink: Arc<K>,
        cursor_store: C,
        config: SyncConfig,
        stop_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ledger,
            sink,
            cursor_store,
            config,
            stop_rx,
            status: Arc::new(RwLock::new(SyncStatus::default())),
        }
    }

    /// Shareable progress view.
    #[must_use]
    pub fn status_handle(&self) -> SyncStatusHandle {
        SyncStatusHandle {
            inner: Arc::clone(&self.status),
        }
    }

    /// Current progress snapshot.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        *self.status.read()
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.status.write().phase = phase;
    }

    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow()
    }

    /// Sleeps for `delay` unless a stop arrives first. Returns true when
    /// the loop should halt.
    async fn wait_or_stop(&mut self, delay: Duration) -> bool {
        tokio::select! {
            changed = self.stop_rx.changed() => match changed {
                Ok(()) => *self.stop_rx.borrow(),
                // Sender gone: nobody can ever stop us explicitly, so stop now.
                Err(_) => true,
            },
            _ = tokio::time::sleep(delay) => *self.stop_rx.borrow(),
        }
    }

    /// Loads the cursor, or derives the starting one on a cold start.
    /// Returns `None` when a stop arrived mid-initialization.
    async fn initialize_cursor(&mut self) -> Result<Option<u64>, SyncError> {
        if let Some(cursor) = self.cursor_store.load()? {
            tracing::info!(cursor, "resuming from durable cursor");
            return Ok(Some(cursor));
        }

        let cursor = match self.config.start {
            // Blocks strictly after the configured genesis are backfilled;
            // the deployment block itself emits no token events.
            StartMode::Genesis(block) => block.saturating_sub(1),
            StartMode::Head => {
                let mut failures = 0u32;
                loop {
                    if self.stop_requested() {
                        return Ok(None);
                    }
                    match self.ledger.head_block().await {
                        Ok(head) => break head,
                        Err(err) => {
                            failures += 1;
                            let delay = compute_backoff(
                                failures,
                                self.config.backoff_base_ms,
                                self.config.backoff_max_ms,
                            );
                            tracing::warn!(
                                failures,
                                error = %err,
                                "head query failed during initialization"
                            );
                            if self.wait_or_stop(delay).await {
                                return Ok(None);
                            }
                        }
                    }
                }
            }
        };

        self.cursor_store.store(cursor)?;
        tracing::info!(cursor, start = ?self.config.start, "cursor initialized");
        Ok(Some(cursor))
    }

    /// One poll: head query, bounded window, ordered apply, checkpoint.
    /// Returns the advanced cursor, or `None` when already caught up.
    async fn poll_once(&mut self, cursor: u64) -> Result<Option<u64>, PollFailure> {
        let head = self
            .ledger
            .head_block()
            .await
            .map_err(PollFailure::Transient)?;
        self.status.write().head = head;

        if head <= cursor {
            return Ok(None);
        }

        let from = cursor + 1;
        let to = head.min(cursor.saturating_add(self.config.window_size));

        let mut events = Vec::new();
        for kind in EventKind::ALL {
            let mut batch = self
                .ledger
                .events_in_range(from, to, *kind)
                .await
                .map_err(PollFailure::Transient)?;
            events.append(&mut batch);
        }
        // Later effects depend on earlier balances: block order first,
        // then the ledger's intra-block emission order.
        events.sort_by_key(|event| (event.block_number, event.log_index));

        let report = self
            .sink
            .apply_events(&events)
            .map_err(|err| PollFailure::Fatal(SyncError::Sink(err)))?;

        // Mirror writes before cursor advance; this ordering is the
        // crash-safety invariant.
        self.cursor_store
            .store(to)
            .map_err(|err| PollFailure::Fatal(SyncError::Cursor(err)))?;

        {
            let mut status = self.status.write();
            status.cursor = Some(to);
            status.windows_applied += 1;
            status.events_applied += report.applied as u64;
            status.events_skipped += report.skipped as u64;
        }
        tracing::debug!(
            from,
            to,
            applied = report.applied,
            skipped = report.skipped,
            "window ingested"
        );
        Ok(Some(to))
    }

    /// Runs until an explicit stop or a fatal error. Transport failures
    /// are absorbed by backoff and never terminate the loop. The
    /// synchronizer is restartable: after a stop, reset the stop signal
    /// to `false` and call `run` again; the durable cursor carries over.
    pub async fn run(&mut self) -> Result<(), SyncError> {
        tracing::info!("event synchronizer starting");
        self.set_phase(SyncPhase::Initializing);

        let initial = match self.initialize_cursor().await? {
            Some(cursor) => cursor,
            None => {
                self.set_phase(SyncPhase::Stopped);
                tracing::info!("stopped during initialization");
                return Ok(());
            }
        };
        self.status.write().cursor = Some(initial);

        let mut cursor = initial;
        let mut failures = 0u32;
        self.set_phase(SyncPhase::Polling);

        loop {
            if self.stop_requested() {
                break;
            }

            match self.poll_once(cursor).await {
                Ok(advanced) => {
                    if let Some(new_cursor) = advanced {
                        cursor = new_cursor;
                    }
                    failures = 0;
                    self.status.write().consecutive_failures = 0;
                    self.set_phase(SyncPhase::Polling);
                }
                Err(PollFailure::Transient(err)) => {
                    failures += 1;
                    self.status.write().consecutive_failures = failures;
                    self.set_phase(SyncPhase::Backoff);
                    tracing::warn!(failures, error = %err, "transport failure; backing off");
                }
                Err(PollFailure::Fatal(err)) => {
                    tracing::error!(error = %err, "synchronizer halted");
                    self.set_phase(SyncPhase::Stopped);
                    return Err(err);
                }
            }

            let delay = if failures > 0 {
                compute_backoff(
                    failures,
                    self.config.backoff_base_ms,
                    self.config.backoff_max_ms,
                )
            } else {
                Duration::from_millis(self.config.poll_interval_ms)
            };
            if self.wait_or_stop(delay).await {
                break;
            }
        }

        self.set_phase(SyncPhase::Stopped);
        tracing::info!("event synchronizer stopped");
        Ok(())
    }
}
