//! # Write Operations
//!
//! The full write surface of the custody ledger, as one tagged type per
//! submission. `BurnWithReason` and `Transfer` act on the caller's own
//! balance; the caller is carried separately by the submission envelope.

use serde::{Deserialize, Serialize};
use shared_types::{Address, AssetMetadata, Hash, Role, U256};
use uuid::Uuid;

/// One write intent against the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Issue new units to a whitelisted account.
    Mint {
        /// Receiving account.
        to: Address,
        /// Amount in base units.
        amount: U256,
        /// Custody receipt reference.
        reason: String,
    },
    /// Destroy units from the caller's balance.
    BurnWithReason {
        /// Amount in base units.
        amount: U256,
        /// Redemption reference.
        reason: String,
    },
    /// Move units from the caller to another account.
    Transfer {
        /// Receiving account.
        to: Address,
        /// Amount in base units.
        amount: U256,
    },
    /// Whitelist one account.
    AddToWhitelist {
        /// Account to list.
        account: Address,
    },
    /// Remove one account from the whitelist.
    RemoveFromWhitelist {
        /// Account to delist.
        account: Address,
    },
    /// Whitelist several accounts in one transaction. Duplicates and the
    /// zero address are skipped, not rejected.
    BatchAddToWhitelist {
        /// Accounts to list.
        accounts: Vec<Address>,
    },
    /// Grant a role.
    GrantRole {
        /// Role to grant.
        role: Role,
        /// Receiving account.
        account: Address,
    },
    /// Revoke a role.
    RevokeRole {
        /// Role to revoke.
        role: Role,
        /// Affected account.
        account: Address,
    },
    /// Engage the global compliance pause.
    Pause,
    /// Release the global compliance pause.
    Unpause,
    /// Replace the asset metadata.
    UpdateMetadata {
        /// Replacement metadata.
        metadata: AssetMetadata,
    },
}

impl Operation {
    /// Stable operation name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Mint { .. } => "mint",
            Operation::BurnWithReason { .. } => "burnWithReason",
            Operation::Transfer { .. } => "transfer",
            Operation::AddToWhitelist { .. } => "addToWhitelist",
            Operation::RemoveFromWhitelist { .. } => "removeFromWhitelist",
            Operation::BatchAddToWhitelist { .. } => "batchAddToWhitelist",
            Operation::GrantRole { .. } => "grantRole",
            Operation::RevokeRole { .. } => "revokeRole",
            Operation::Pause => "pause",
            Operation::Unpause => "unpause",
            Operation::UpdateMetadata { .. } => "updateMetadata",
        }
    }
}

/// Confirmation that a submission landed on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Hash assigned to the transaction.
    pub tx_hash: Hash,
    /// Block the transaction landed in.
    pub block_number: u64,
}

/// A write intent plus its caller and a correlation id for tracing the
/// submission across retries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Correlation id, stable across transport retries.
    pub correlation_id: Uuid,
    /// Account the ledger attributes the write to.
    pub caller: Address,
    /// The write intent.
    pub operation: Operation,
}

impl Submission {
    /// Wraps an operation with a fresh correlation id.
    #[must_use]
    pub fn new(caller: Address, operation: Operation) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            caller,
            operation,
        }
    }
}
