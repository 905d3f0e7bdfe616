//! # Transport Fault Flows
//!
//! Unreliable-node behavior end to end: flaky reads absorbed by backoff,
//! and confirmation timeouts whose writes land anyway and are reconciled
//! by the next poll.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::support::{addr, wait_for, Devnet, DEPLOYER};
    use cc_ledger_client::{
        ClientError, LedgerConnection, Operation, Receipt, SimulatedLedger, Submission,
        SubmissionClient, SubmissionConfig,
    };
    use shared_types::{AccountState, Address, AssetMetadata, EventKind, LedgerEvent, U256};

    /// Wraps the simulated ledger with a slow submission path. The write
    /// keeps going even when the caller gives up waiting, which is
    /// exactly how a real chain behaves after a timeout.
    struct SlowNode {
        inner: Arc<SimulatedLedger>,
        submit_delay: Duration,
    }

    #[async_trait]
    impl LedgerConnection for SlowNode {
        async fn head_block(&self) -> Result<u64, ClientError> {
            self.inner.head_block().await
        }

        async fn events_in_range(
            &self,
            from_block: u64,
            to_block: u64,
            kind: EventKind,
        ) -> Result<Vec<LedgerEvent>, ClientError> {
            self.inner.events_in_range(from_block, to_block, kind).await
        }

        async fn account_state(&self, address: &Address) -> Result<AccountState, ClientError> {
            self.inner.account_state(address).await
        }

        async fn pause_status(&self) -> Result<bool, ClientError> {
            self.inner.pause_status().await
        }

        async fn metadata(&self) -> Result<AssetMetadata, ClientError> {
            self.inner.metadata().await
        }

        async fn submit(
            &self,
            caller: Address,
            operation: Operation,
        ) -> Result<Receipt, ClientError> {
            let inner = Arc::clone(&self.inner);
            let delay = self.submit_delay;
            let landed = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                inner.submit(caller, operation).await
            });
            landed.await.map_err(|e| ClientError::Transport {
                message: e.to_string(),
            })?
        }
    }

    #[tokio::test]
    async fn test_flaky_transport_converges_without_double_counting() {
        let devnet = Devnet::new();
        devnet.fund(addr(1), 1_000).await;
        devnet
            .submit(Operation::AddToWhitelist { account: addr(2) })
            .await;
        devnet
            .submit_as(
                addr(1),
                Operation::Transfer {
                    to: addr(2),
                    amount: U256::from(123u64),
                },
            )
            .await;

        // The first several polls fail; backoff rides through them.
        devnet.ledger.inject_failures(5);
        devnet.sync_to_head().await;

        assert_eq!(
            devnet.projection.history_len(),
            devnet.ledger.event_count()
        );
        assert_eq!(
            devnet.projection.account_record(&addr(2)).unwrap().balance,
            U256::from(123u64)
        );
        assert_eq!(
            devnet.projection.balance_total(),
            devnet.projection.total_supply()
        );
    }

    #[tokio::test]
    async fn test_unknown_outcome_is_reconciled_by_the_next_poll() {
        let devnet = Devnet::new();
        let slow = Arc::new(SlowNode {
            inner: Arc::clone(&devnet.ledger),
            submit_delay: Duration::from_millis(100),
        });
        let client = SubmissionClient::new(
            slow,
            SubmissionConfig {
                confirmation_timeout_ms: 20,
                ..SubmissionConfig::for_testing()
            },
        );

        // The confirmation window elapses before the node answers.
        let outcome = client
            .submit(Submission::new(
                DEPLOYER,
                Operation::AddToWhitelist { account: addr(7) },
            ))
            .await;
        assert!(matches!(outcome, Err(ClientError::OutcomeUnknown { .. })));

        // The write lands on the ledger anyway.
        wait_for(|| devnet.ledger.event_count() == 1).await;

        // The poller reconciles it into the mirror.
        devnet.sync_to_head().await;
        assert!(devnet.projection.is_whitelisted(&addr(7)));
    }

    #[tokio::test]
    async fn test_mirror_backs_local_pre_validation() {
        let devnet = Devnet::new();
        devnet.fund(addr(1), 500).await;
        devnet
            .submit(Operation::AddToWhitelist { account: addr(2) })
            .await;
        devnet.sync_to_head().await;

        // The CRUD layer's whitelist-check path: rules over the mirror.
        assert!(cc_state_model::can_transfer(
            &*devnet.projection,
            &addr(1),
            &addr(2),
            U256::from(100u64)
        )
        .is_ok());
        assert!(cc_state_model::can_transfer(
            &*devnet.projection,
            &addr(1),
            &addr(9),
            U256::from(100u64)
        )
        .is_err());

        // A stale mirror only costs a wasted round trip, never a wrong
        // accept: the ledger still re-validates.
        devnet.submit(Operation::Pause).await;
        assert!(cc_state_model::can_transfer(
            &*devnet.projection,
            &addr(1),
            &addr(2),
            U256::from(100u64)
        )
        .is_ok());
        let err = devnet
            .ledger
            .submit(
                addr(1),
                Operation::Transfer {
                    to: addr(2),
                    amount: U256::from(100u64),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Rejected(shared_types::RuleError::Paused)
        );
    }
}
