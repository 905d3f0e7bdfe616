//! # Crash Recovery
//!
//! The cursor's contract: monotonically non-decreasing, advanced only
//! after a window is durably mirrored, and safe to resume from after a
//! crash at any point in between.

#[cfg(test)]
mod tests {
    use cc_event_sync::{CursorStore, EventSink};

    use crate::support::{addr, Devnet};
    use cc_ledger_client::{LedgerConnection, Operation};
    use shared_types::{EventKind, LedgerEvent, U256};

    async fn fetch_all(devnet: &Devnet, from: u64, to: u64) -> Vec<LedgerEvent> {
        let mut events = Vec::new();
        for kind in EventKind::ALL {
            events.extend(
                devnet
                    .ledger
                    .events_in_range(from, to, *kind)
                    .await
                    .unwrap(),
            );
        }
        events.sort_by_key(|event| (event.block_number, event.log_index));
        events
    }

    #[tokio::test]
    async fn test_crash_mid_window_equals_uninterrupted_run() {
        // Two devnets fed the same submissions: one ingests cleanly, the
        // other "crashes" after mirroring a window but before the cursor
        // advances, then restarts.
        let clean = Devnet::new();
        let crashed = Devnet::new();
        for devnet in [&clean, &crashed] {
            devnet.fund(addr(1), 1_000).await;
            devnet
                .submit(Operation::AddToWhitelist { account: addr(2) })
                .await;
            devnet
                .submit_as(
                    addr(1),
                    Operation::Transfer {
                        to: addr(2),
                        amount: U256::from(300u64),
                    },
                )
                .await;
        }

        clean.sync_to_head().await;

        // Crash simulation: the first window's events reach the mirror,
        // the cursor write never happens.
        let window = fetch_all(&crashed, 1, 3).await;
        EventSink::apply_events(&*crashed.projection, &window).unwrap();
        assert_eq!(crashed.cursor.load().unwrap(), None);

        // Restart: the synchronizer re-fetches from scratch and the
        // duplicate window deduplicates to nothing.
        crashed.sync_to_head().await;

        for byte in [1u8, 2] {
            assert_eq!(
                crashed.projection.account_record(&addr(byte)),
                clean.projection.account_record(&addr(byte)),
            );
        }
        assert_eq!(
            crashed.projection.total_supply(),
            clean.projection.total_supply()
        );
        assert_eq!(
            crashed.projection.history_len(),
            clean.projection.history_len()
        );
    }

    #[tokio::test]
    async fn test_cursor_is_monotonic_across_restarts() {
        let devnet = Devnet::new();
        devnet.fund(addr(1), 100).await;
        devnet.sync_to_head().await;
        let first = devnet.cursor.load().unwrap().unwrap();

        // No new blocks: resync must not move the cursor backward.
        devnet.sync_to_head().await;
        let second = devnet.cursor.load().unwrap().unwrap();
        assert_eq!(second, first);

        devnet
            .submit(Operation::AddToWhitelist { account: addr(3) })
            .await;
        devnet.sync_to_head().await;
        let third = devnet.cursor.load().unwrap().unwrap();
        assert!(third > second);
    }

    #[tokio::test]
    async fn test_restart_never_double_applies() {
        let devnet = Devnet::new();
        devnet.fund(addr(1), 500).await;
        devnet.sync_to_head().await;

        let balance_after_first = devnet
            .projection
            .account_record(&addr(1))
            .unwrap()
            .balance;

        // Three consecutive restarts over the same history.
        for _ in 0..3 {
            devnet.sync_to_head().await;
        }
        assert_eq!(
            devnet.projection.account_record(&addr(1)).unwrap().balance,
            balance_after_first
        );
        assert_eq!(
            devnet.projection.history_len(),
            devnet.ledger.event_count()
        );
    }
}
