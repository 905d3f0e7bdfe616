//! # End-to-End Scenarios
//!
//! The compliance flows a custody operator actually runs, checked from
//! submission through ingestion to the mirror's read surface.

#[cfg(test)]
mod tests {
    use crate::support::{addr, Devnet, DEPLOYER};
    use cc_ledger_client::{ClientError, LedgerConnection, Operation};
    use cc_projection::ProjectionStore;
    use cc_projection::InMemoryStorage;
    use shared_types::{
        Address, EventKind, EventPayload, Hash, LedgerEvent, Role, RuleError, U256,
    };

    #[tokio::test]
    async fn test_issuance_and_transfer_mirror_exactly() {
        let devnet = Devnet::new();
        let a = addr(1);
        let b = addr(2);

        devnet.submit(Operation::AddToWhitelist { account: a }).await;
        devnet
            .submit(Operation::Mint {
                to: a,
                amount: U256::from(1000u64),
                reason: "receipt-1".to_string(),
            })
            .await;
        devnet.submit(Operation::AddToWhitelist { account: b }).await;
        devnet
            .submit_as(
                a,
                Operation::Transfer {
                    to: b,
                    amount: U256::from(400u64),
                },
            )
            .await;

        devnet.sync_to_head().await;

        assert_eq!(
            devnet.projection.account_record(&a).unwrap().balance,
            U256::from(600u64)
        );
        assert_eq!(
            devnet.projection.account_record(&b).unwrap().balance,
            U256::from(400u64)
        );
        assert_eq!(devnet.projection.total_supply(), U256::from(1000u64));
        assert!(devnet.projection.is_whitelisted(&a));
        assert!(devnet.projection.is_whitelisted(&b));
    }

    #[tokio::test]
    async fn test_pause_blocks_then_unpause_allows_retry() {
        let devnet = Devnet::new();
        let a = addr(1);
        let b = addr(2);
        devnet.fund(a, 100).await;
        devnet.submit(Operation::AddToWhitelist { account: b }).await;

        devnet.submit(Operation::Pause).await;
        let transfer = Operation::Transfer {
            to: b,
            amount: U256::from(40u64),
        };
        let err = devnet
            .ledger
            .submit(a, transfer.clone())
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Rejected(RuleError::Paused));

        devnet.submit(Operation::Unpause).await;
        devnet.ledger.submit(a, transfer).await.unwrap();

        devnet.sync_to_head().await;
        assert_eq!(
            devnet.projection.account_record(&b).unwrap().balance,
            U256::from(40u64)
        );
        assert!(!devnet.projection.paused());
    }

    #[tokio::test]
    async fn test_mint_to_non_whitelisted_changes_nothing() {
        let devnet = Devnet::new();
        let stranger = addr(9);

        let before_events = devnet.ledger.event_count();
        let err = devnet
            .ledger
            .submit(
                DEPLOYER,
                Operation::Mint {
                    to: stranger,
                    amount: U256::from(50u64),
                    reason: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Rejected(RuleError::NotWhitelisted { account: stranger })
        );
        assert_eq!(devnet.ledger.event_count(), before_events);

        devnet.sync_to_head().await;
        assert!(devnet.projection.account_record(&stranger).is_none());
        assert_eq!(devnet.projection.total_supply(), U256::zero());
    }

    #[tokio::test]
    async fn test_role_lifecycle_reaches_the_mirror() {
        let devnet = Devnet::new();
        let officer = addr(4);

        devnet
            .submit(Operation::GrantRole {
                role: Role::Issuer,
                account: officer,
            })
            .await;
        devnet.sync_to_head().await;
        assert!(devnet
            .projection
            .account_record(&officer)
            .unwrap()
            .roles
            .contains(&Role::Issuer));

        devnet
            .submit(Operation::RevokeRole {
                role: Role::Issuer,
                account: officer,
            })
            .await;
        devnet.sync_to_head().await;
        assert!(!devnet
            .projection
            .account_record(&officer)
            .unwrap()
            .roles
            .contains(&Role::Issuer));
    }

    #[tokio::test]
    async fn test_metadata_replicates_verbatim() {
        let devnet = Devnet::new();
        let mut updated = crate::support::metadata();
        updated.storage_location = "vault-sgp-2".to_string();
        updated.total_quantity = 7_500;

        devnet
            .submit(Operation::UpdateMetadata {
                metadata: updated.clone(),
            })
            .await;
        devnet.sync_to_head().await;

        let mirrored = devnet.projection.metadata().unwrap();
        assert_eq!(mirrored.storage_location, "vault-sgp-2");
        assert_eq!(mirrored.total_quantity, 7_500);
    }

    #[test]
    fn test_shared_tx_hash_different_kinds_are_distinct_records() {
        // A single submission can emit several event kinds. They must be
        // ingested as distinct records, never deduplicated against each
        // other.
        let store = ProjectionStore::open(InMemoryStorage::new()).unwrap();
        let tx = Hash::new([0x77; 32]);
        let account = Address::new([1u8; 20]);
        let events = [
            LedgerEvent {
                tx_hash: tx,
                block_number: 1,
                timestamp: 0,
                log_index: 0,
                payload: EventPayload::WhitelistUpdated {
                    account,
                    status: true,
                },
            },
            LedgerEvent {
                tx_hash: tx,
                block_number: 1,
                timestamp: 0,
                log_index: 1,
                payload: EventPayload::Mint {
                    to: account,
                    amount: U256::from(10u64),
                    reason: String::new(),
                },
            },
        ];
        let report = store.apply_events(&events).unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 0);

        let kinds: Vec<EventKind> = store.history().iter().map(|r| r.id.kind).collect();
        assert!(kinds.contains(&EventKind::WhitelistUpdated));
        assert!(kinds.contains(&EventKind::Mint));

        // Replaying one of the pair skips it without touching the other.
        let replay = store.apply_events(&events[..1]).unwrap();
        assert_eq!(replay.skipped, 1);
        assert_eq!(store.history_len(), 2);
    }

    #[tokio::test]
    async fn test_batch_whitelist_dedup_identity_spans_accounts() {
        let devnet = Devnet::new();
        devnet
            .submit(Operation::BatchAddToWhitelist {
                accounts: vec![addr(1), addr(2), addr(3)],
            })
            .await;
        devnet.sync_to_head().await;

        // Three events share one transaction hash; all three land.
        assert_eq!(devnet.projection.history_len(), 3);
        let history = devnet.projection.history();
        let tx = history[0].event.tx_hash;
        assert!(history.iter().all(|r| r.event.tx_hash == tx));
        for i in 1..=3u8 {
            assert!(devnet.projection.is_whitelisted(&addr(i)));
        }
    }
}
