//! # Simulated Ledger
//!
//! A complete in-process stand-in for the external custody ledger. It
//! enforces the same transition rules the state model mirrors, serializes
//! all writes behind one lock, assigns Keccak-256 transaction hashes and
//! block numbers, and appends typed events in deterministic intra-block
//! order.
//!
//! Fault injection makes the transport unreliable on demand, which is how
//! the synchronizer's backoff and the submission retry path are tested.

use async_trait::async_trait;
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;

use cc_state_model::{
    can_burn, can_change_role, can_mint, can_pause, can_set_whitelist, can_transfer, can_unpause,
    filter_whitelist_batch, StateView,
};
use shared_types::{
    AccountState, Address, AssetMetadata, EventKind, EventPayload, Hash, LedgerEvent, Role,
    RuleError, U256,
};

use crate::domain::{ClientError, Operation, Receipt};
use crate::ports::LedgerConnection;

/// Timestamp of the simulated genesis block (unix seconds).
const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Seconds between simulated blocks.
const BLOCK_INTERVAL_SECS: u64 = 12;

/// The authoritative book: balances, flags, roles, metadata, event log.
#[derive(Debug)]
struct LedgerBook {
    accounts: HashMap<Address, AccountState>,
    paused: bool,
    metadata: AssetMetadata,
    total_supply: U256,
    head: u64,
    events: Vec<LedgerEvent>,
    tx_counter: u64,
}

impl StateView for LedgerBook {
    fn account(&self, address: &Address) -> AccountState {
        self.accounts.get(address).cloned().unwrap_or_default()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

impl LedgerBook {
    fn account_mut(&mut self, address: Address) -> &mut AccountState {
        self.accounts.entry(address).or_default()
    }
}

/// In-process ledger implementing [`LedgerConnection`].
pub struct SimulatedLedger {
    book: Mutex<LedgerBook>,
    /// Remaining calls to fail with a transport error.
    fail_budget: Mutex<u32>,
}

impl SimulatedLedger {
    /// Creates a ledger whose deployer holds all three roles, mirroring a
    /// custody contract constructor. The deployer is not whitelisted by
    /// default; compliance listing is always an explicit operation.
    #[must_use]
    pub fn new(deployer: Address, metadata: AssetMetadata) -> Self {
        let mut accounts = HashMap::new();
        let mut deployer_state = AccountState::default();
        deployer_state.roles.insert(Role::DefaultAdmin);
        deployer_state.roles.insert(Role::Admin);
        deployer_state.roles.insert(Role::Issuer);
        accounts.insert(deployer, deployer_state);

        Self {
            book: Mutex::new(LedgerBook {
                accounts,
                paused: false,
                metadata,
                total_supply: U256::zero(),
                head: 0,
                events: Vec::new(),
                tx_counter: 0,
            }),
            fail_budget: Mutex::new(0),
        }
    }

    /// Makes the next `count` calls fail with a transport error, across
    /// every method of the connection.
    pub fn inject_failures(&self, count: u32) {
        *self.fail_budget.lock() = count;
    }

    /// Mines `count` empty blocks.
    pub fn advance_blocks(&self, count: u64) {
        self.book.lock().head += count;
    }

    /// Ledger-side total supply, for test assertions.
    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.book.lock().total_supply
    }

    /// Number of events the ledger has emitted so far.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.book.lock().events.len()
    }

    fn check_faults(&self) -> Result<(), ClientError> {
        let mut budget = self.fail_budget.lock();
        if *budget > 0 {
            *budget -= 1;
            return Err(ClientError::Transport {
                message: "injected node failure".to_string(),
            });
        }
        Ok(())
    }

    /// Keccak-256 over (block, caller, counter), like a chain would derive
    /// a transaction hash from its signed envelope.
    fn derive_tx_hash(block: u64, caller: &Address, counter: u64) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(block.to_be_bytes());
        hasher.update(caller.as_bytes());
        hasher.update(counter.to_be_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Hash::new(bytes)
    }

    /// Validates and applies one submission under the book lock, emitting
    /// events in intra-block order.
    fn execute(&self, caller: Address, operation: Operation) -> Result<Receipt, ClientError> {
        let mut book = self.book.lock();

        // Each accepted write lands in its own block.
        let block_number = book.head + 1;
        let tx_hash = Self::derive_tx_hash(block_number, &caller, book.tx_counter);
        let timestamp = GENESIS_TIMESTAMP + block_number * BLOCK_INTERVAL_SECS;

        let mut payloads: Vec<EventPayload> = Vec::new();
        match operation {
            Operation::Mint { to, amount, reason } => {
                can_mint(&*book, &caller, &to, amount)?;
                let new_supply = book
                    .total_supply
                    .checked_add(amount)
                    .ok_or(RuleError::InvalidAmount)?;
                book.total_supply = new_supply;
                let account = book.account_mut(to);
                account.balance = account
                    .balance
                    .checked_add(amount)
                    .ok_or(RuleError::InvalidAmount)?;
                payloads.push(EventPayload::Mint { to, amount, reason });
            }
            Operation::BurnWithReason { amount, reason } => {
                can_burn(&*book, &caller, amount)?;
                book.total_supply -= amount;
                let account = book.account_mut(caller);
                account.balance -= amount;
                payloads.push(EventPayload::Burn {
                    from: caller,
                    amount,
                    reason,
                });
            }
            Operation::Transfer { to, amount } => {
                can_transfer(&*book, &caller, &to, amount)?;
                book.account_mut(caller).balance -= amount;
                let recipient = book.account_mut(to);
                recipient.balance = recipient
                    .balance
                    .checked_add(amount)
                    .ok_or(RuleError::InvalidAmount)?;
                payloads.push(EventPayload::Transfer {
                    from: caller,
                    to,
                    amount,
                });
            }
            Operation::AddToWhitelist { account } => {
                if can_set_whitelist(&*book, &caller, &account, true)? {
                    book.account_mut(account).whitelisted = true;
                    payloads.push(EventPayload::WhitelistUpdated {
                        account,
                        status: true,
                    });
                }
            }
            Operation::RemoveFromWhitelist { account } => {
                if can_set_whitelist(&*book, &caller, &account, false)? {
                    book.account_mut(account).whitelisted = false;
                    payloads.push(EventPayload::WhitelistUpdated {
                        account,
                        status: false,
                    });
                }
            }
            Operation::BatchAddToWhitelist { accounts } => {
                let effective = filter_whitelist_batch(&*book, &caller, &accounts)?;
                for account in effective {
                    book.account_mut(account).whitelisted = true;
                    payloads.push(EventPayload::WhitelistUpdated {
                        account,
                        status: true,
                    });
                }
            }
            Operation::GrantRole { role, account } => {
                can_change_role(&*book, &caller, role, &account)?;
                let target = book.account_mut(account);
                if target.roles.insert(role) {
                    payloads.push(EventPayload::RoleGranted { role, account });
                }
            }
            Operation::RevokeRole { role, account } => {
                can_change_role(&*book, &caller, role, &account)?;
                let target = book.account_mut(account);
                if target.roles.remove(&role) {
                    payloads.push(EventPayload::RoleRevoked { role, account });
                }
            }
            Operation::Pause => {
                can_pause(&*book, &caller)?;
                book.paused = true;
                payloads.push(EventPayload::Paused);
            }
            Operation::Unpause => {
                can_unpause(&*book, &caller)?;
                book.paused = false;
                payloads.push(EventPayload::Unpaused);
            }
            Operation::UpdateMetadata { metadata } => {
                if !book.account(&caller).has_role(Role::Admin) {
                    return Err(ClientError::Rejected(RuleError::Unauthorized {
                        caller,
                        required: Role::Admin,
                    }));
                }
                let created_at = book.metadata.created_at;
                book.metadata = AssetMetadata {
                    created_at,
                    updated_at: timestamp,
                    ..metadata
                };
                payloads.push(EventPayload::MetadataUpdated {
                    metadata: book.metadata.clone(),
                });
            }
        }

        book.head = block_number;
        book.tx_counter += 1;
        for (log_index, payload) in payloads.into_iter().enumerate() {
            book.events.push(LedgerEvent {
                tx_hash,
                block_number,
                timestamp,
                log_index: log_index as u32,
                payload,
            });
        }

        tracing::debug!(block = block_number, tx = %tx_hash, "submission accepted");
        Ok(Receipt {
            tx_hash,
            block_number,
        })
    }
}

#[async_trait]
impl LedgerConnection for SimulatedLedger {
    async fn head_block(&self) -> Result<u64, ClientError> {
        self.check_faults()?;
        Ok(self.book.lock().head)
    }

    async fn events_in_range(
        &self,
        from_block: u64,
        to_block: u64,
        kind: EventKind,
    ) -> Result<Vec<LedgerEvent>, ClientError> {
        self.check_faults()?;
        let book = self.book.lock();
        Ok(book
            .events
            .iter()
            .filter(|event| {
                event.block_number >= from_block
                    && event.block_number <= to_block
                    && event.payload.kind() == kind
            })
            .cloned()
            .collect())
    }

    async fn account_state(&self, address: &Address) -> Result<AccountState, ClientError> {
        self.check_faults()?;
        Ok(self.book.lock().account(address))
    }

    async fn pause_status(&self) -> Result<bool, ClientError> {
        self.check_faults()?;
        Ok(self.book.lock().paused)
    }

    async fn metadata(&self) -> Result<AssetMetadata, ClientError> {
        self.check_faults()?;
        Ok(self.book.lock().metadata.clone())
    }

    async fn submit(&self, caller: Address, operation: Operation) -> Result<Receipt, ClientError> {
        self.check_faults()?;
        self.execute(caller, operation)
    }
}
