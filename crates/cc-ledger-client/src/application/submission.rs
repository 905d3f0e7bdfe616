//! # Submission Client
//!
//! Wraps a [`LedgerConnection`] with the write-path policy: transient
//! transport failures are retried with doubling backoff, and a confirmation
//! deadline converts a silent node into an *unknown outcome* rather than a
//! failure. The write may still land after the deadline; the polling
//! synchronizer reconciles it on the next window.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ClientError, Receipt, Submission};
use crate::ports::LedgerConnection;

/// Write-path policy knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Deadline for one submit-and-confirm attempt, in milliseconds.
    pub confirmation_timeout_ms: u64,
    /// Transport retries before the error is surfaced.
    pub max_transport_retries: u32,
    /// First retry delay, in milliseconds. Doubles per consecutive failure.
    pub retry_backoff_ms: u64,
    /// Backoff ceiling, in milliseconds.
    pub retry_backoff_max_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_ms: 30_000,
            max_transport_retries: 3,
            retry_backoff_ms: 500,
            retry_backoff_max_ms: 8_000,
        }
    }
}

impl SubmissionConfig {
    /// Config for testing (tight deadlines, short backoff).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            confirmation_timeout_ms: 250,
            max_transport_retries: 2,
            retry_backoff_ms: 5,
            retry_backoff_max_ms: 20,
        }
    }
}

/// Doubling backoff, capped. Attempts count from 1.
fn backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(16);
    Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
}

/// The write path: pre-validated intents go through here to the ledger.
pub struct SubmissionClient<C> {
    connection: Arc<C>,
    config: SubmissionConfig,
}

impl<C: LedgerConnection> SubmissionClient<C> {
    /// Wraps a connection with the given policy.
    pub fn new(connection: Arc<C>, config: SubmissionConfig) -> Self {
        Self { connection, config }
    }

    /// Submits a write and waits for its receipt.
    ///
    /// Blocks only the calling context. Business rejections come back
    /// verbatim and are never retried; only transport failures are. When
    /// the confirmation deadline elapses the result is
    /// [`ClientError::OutcomeUnknown`]; re-submitting at that point could
    /// double-apply, so the caller must wait for reconciliation instead.
    pub async fn submit(&self, submission: Submission) -> Result<Receipt, ClientError> {
        let deadline = Duration::from_millis(self.config.confirmation_timeout_ms);
        let mut attempt = 0u32;

        loop {
            let call = self
                .connection
                .submit(submission.caller, submission.operation.clone());
            match tokio::time::timeout(deadline, call).await {
                Err(_) => {
                    tracing::warn!(
                        correlation_id = %submission.correlation_id,
                        operation = submission.operation.name(),
                        timeout_ms = self.config.confirmation_timeout_ms,
                        "confirmation window elapsed; outcome unknown"
                    );
                    return Err(ClientError::OutcomeUnknown { tx_hash: None });
                }
                Ok(Ok(receipt)) => {
                    tracing::info!(
                        correlation_id = %submission.correlation_id,
                        operation = submission.operation.name(),
                        block = receipt.block_number,
                        tx = %receipt.tx_hash,
                        "submission confirmed"
                    );
                    return Ok(receipt);
                }
                Ok(Err(err)) if err.is_retryable() && attempt < self.config.max_transport_retries => {
                    attempt += 1;
                    let delay = backoff_delay(
                        attempt,
                        self.config.retry_backoff_ms,
                        self.config.retry_backoff_max_ms,
                    );
                    tracing::warn!(
                        correlation_id = %submission.correlation_id,
                        operation = submission.operation.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transport failure; retrying submission"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(Err(err)) => return Err(err),
            }
        }
    }
}
