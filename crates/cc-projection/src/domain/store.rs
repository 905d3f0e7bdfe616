//! # Projection Store
//!
//! The local mirror. State is derived exclusively by replaying ledger
//! events; no application path writes account fields. One lock guards the
//! apply path so event application and concurrent reads are linearizable.
//!
//! A batch is staged first and persisted atomically before the in-memory
//! views change, so an integrity violation or storage failure leaves both
//! the store and its memory image exactly as they were.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

use shared_types::{Address, AssetMetadata, EventId, EventPayload, Hash, LedgerEvent, U256};

use crate::domain::errors::ProjectionError;
use crate::domain::records::{keys, AccountRecord, AppliedBatch, HistoryRecord};
use crate::ports::{BatchOperation, ProjectionStorage};

#[derive(Default)]
struct ProjectionState {
    accounts: HashMap<Address, AccountRecord>,
    seen: HashSet<EventId>,
    history: Vec<HistoryRecord>,
    total_supply: U256,
    paused: bool,
    metadata: Option<AssetMetadata>,
}

/// The durable mirror of ledger state.
pub struct ProjectionStore<S> {
    storage: S,
    inner: RwLock<ProjectionState>,
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ProjectionError> {
    bincode::serialize(value).map_err(|e| ProjectionError::Corrupt(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ProjectionError> {
    bincode::deserialize(bytes).map_err(|e| ProjectionError::Corrupt(e.to_string()))
}

/// Staged copy of an account, materialized lazily at zero balance.
fn staged_account<'a>(
    staged: &'a mut HashMap<Address, AccountRecord>,
    committed: &HashMap<Address, AccountRecord>,
    address: Address,
) -> &'a mut AccountRecord {
    staged.entry(address).or_insert_with(|| {
        committed
            .get(&address)
            .cloned()
            .unwrap_or_else(|| AccountRecord::materialize(address))
    })
}

fn debit(
    record: &mut AccountRecord,
    amount: U256,
    tx_hash: Hash,
) -> Result<(), ProjectionError> {
    if record.balance < amount {
        return Err(ProjectionError::IntegrityViolation {
            account: Some(record.address),
            tx_hash,
            detail: format!(
                "balance underflow: {} available, {} debited",
                record.balance, amount
            ),
        });
    }
    record.balance -= amount;
    Ok(())
}

fn credit(record: &mut AccountRecord, amount: U256, tx_hash: Hash) -> Result<(), ProjectionError> {
    record.balance = record.balance.checked_add(amount).ok_or_else(|| {
        ProjectionError::IntegrityViolation {
            account: Some(record.address),
            tx_hash,
            detail: "balance overflow".to_string(),
        }
    })?;
    Ok(())
}

impl<S: ProjectionStorage> ProjectionStore<S> {
    /// Opens the mirror, replaying every persisted record into memory.
    pub fn open(storage: S) -> Result<Self, ProjectionError> {
        let mut state = ProjectionState::default();

        for (_, bytes) in storage.prefix_scan(keys::ACCOUNT)? {
            let record: AccountRecord = decode(&bytes)?;
            state.accounts.insert(record.address, record);
        }
        for (_, bytes) in storage.prefix_scan(keys::HISTORY)? {
            let record: HistoryRecord = decode(&bytes)?;
            state.seen.insert(record.id);
            state.history.push(record);
        }
        state
            .history
            .sort_by_key(|r| (r.event.block_number, r.event.log_index));

        if let Some(bytes) = storage.get(keys::SUPPLY)? {
            state.total_supply = decode(&bytes)?;
        }
        if let Some(bytes) = storage.get(keys::PAUSED)? {
            state.paused = decode(&bytes)?;
        }
        if let Some(bytes) = storage.get(keys::ASSET)? {
            state.metadata = Some(decode(&bytes)?);
        }

        tracing::info!(
            accounts = state.accounts.len(),
            events = state.history.len(),
            "projection store opened"
        );
        Ok(Self {
            storage,
            inner: RwLock::new(state),
        })
    }

    /// Applies one window of events as a single logical batch.
    ///
    /// Events must arrive in (block number, intra-block emission) order;
    /// later events depend on balances set by earlier ones. Events whose
    /// identity is already ingested are skipped. The staged changes are
    /// written to durable storage atomically, then merged into the live
    /// views; an error leaves the mirror untouched, which keeps
    /// re-application after a crash idempotent.
    pub fn apply_events(&self, events: &[LedgerEvent]) -> Result<AppliedBatch, ProjectionError> {
        let mut inner = self.inner.write();

        let mut staged: HashMap<Address, AccountRecord> = HashMap::new();
        let mut fresh: Vec<HistoryRecord> = Vec::new();
        let mut fresh_ids: HashSet<EventId> = HashSet::new();
        let mut supply = inner.total_supply;
        let mut paused = inner.paused;
        let mut metadata = inner.metadata.clone();
        let mut skipped = 0usize;

        for event in events {
            let id = event.id();
            if inner.seen.contains(&id) || !fresh_ids.insert(id) {
                skipped += 1;
                continue;
            }

            let tx_hash = event.tx_hash;
            match &event.payload {
                EventPayload::Transfer { from, to, amount } => {
                    debit(
                        staged_account(&mut staged, &inner.accounts, *from),
                        *amount,
                        tx_hash,
                    )?;
                    credit(
                        staged_account(&mut staged, &inner.accounts, *to),
                        *amount,
                        tx_hash,
                    )?;
                }
                EventPayload::Mint { to, amount, .. } => {
                    credit(
                        staged_account(&mut staged, &inner.accounts, *to),
                        *amount,
                        tx_hash,
                    )?;
                    supply = supply.checked_add(*amount).ok_or_else(|| {
                        ProjectionError::IntegrityViolation {
                            account: Some(*to),
                            tx_hash,
                            detail: "total supply overflow".to_string(),
                        }
                    })?;
                }
                EventPayload::Burn { from, amount, .. } => {
                    debit(
                        staged_account(&mut staged, &inner.accounts, *from),
                        *amount,
                        tx_hash,
                    )?;
                    supply = supply.checked_sub(*amount).ok_or_else(|| {
                        ProjectionError::IntegrityViolation {
                            account: Some(*from),
                            tx_hash,
                            detail: "total supply underflow".to_string(),
                        }
                    })?;
                }
                EventPayload::WhitelistUpdated { account, status } => {
                    staged_account(&mut staged, &inner.accounts, *account).whitelisted = *status;
                }
                EventPayload::Paused => paused = true,
                EventPayload::Unpaused => paused = false,
                EventPayload::RoleGranted { role, account } => {
                    staged_account(&mut staged, &inner.accounts, *account)
                        .roles
                        .insert(*role);
                }
                EventPayload::RoleRevoked { role, account } => {
                    staged_account(&mut staged, &inner.accounts, *account)
                        .roles
                        .remove(role);
                }
                EventPayload::MetadataUpdated { metadata: next } => {
                    metadata = Some(next.clone());
                }
            }

            fresh.push(HistoryRecord::from_event(event.clone()));
        }

        if fresh.is_empty() {
            return Ok(AppliedBatch {
                applied: 0,
                skipped,
            });
        }

        // Persist first; memory views change only after the batch lands.
        let mut operations = Vec::with_capacity(fresh.len() + staged.len() + 3);
        for record in &fresh {
            operations.push(BatchOperation::Put {
                key: HistoryRecord::storage_key(&record.id),
                value: encode(record)?,
            });
        }
        for record in staged.values() {
            operations.push(BatchOperation::Put {
                key: AccountRecord::storage_key(&record.address),
                value: encode(record)?,
            });
        }
        if supply != inner.total_supply {
            operations.push(BatchOperation::Put {
                key: keys::SUPPLY.to_vec(),
                value: encode(&supply)?,
            });
        }
        if paused != inner.paused {
            operations.push(BatchOperation::Put {
                key: keys::PAUSED.to_vec(),
                value: encode(&paused)?,
            });
        }
        if metadata != inner.metadata {
            if let Some(asset) = &metadata {
                operations.push(BatchOperation::Put {
                    key: keys::ASSET.to_vec(),
                    value: encode(asset)?,
                });
            }
        }
        self.storage.write_batch(operations)?;

        let applied = fresh.len();
        inner.accounts.extend(staged);
        inner.seen.extend(fresh_ids);
        inner.history.append(&mut fresh);
        inner.total_supply = supply;
        inner.paused = paused;
        inner.metadata = metadata;

        tracing::debug!(applied, skipped, "event batch applied");
        Ok(AppliedBatch { applied, skipped })
    }

    /// Mirrored record for one account, if it has ever been seen.
    #[must_use]
    pub fn account_record(&self, address: &Address) -> Option<AccountRecord> {
        self.inner.read().accounts.get(address).cloned()
    }

    /// Whether an address is currently whitelisted in the mirror.
    #[must_use]
    pub fn is_whitelisted(&self, address: &Address) -> bool {
        self.inner
            .read()
            .accounts
            .get(address)
            .map(|r| r.whitelisted)
            .unwrap_or(false)
    }

    /// Mirrored total supply.
    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.inner.read().total_supply
    }

    /// Sum of all mirrored balances. Equal to [`Self::total_supply`]
    /// whenever the mirror is consistent.
    #[must_use]
    pub fn balance_total(&self) -> U256 {
        let inner = self.inner.read();
        inner
            .accounts
            .values()
            .fold(U256::zero(), |acc, r| acc.saturating_add(r.balance))
    }

    /// Mirrored global pause flag.
    #[must_use]
    pub fn paused(&self) -> bool {
        self.inner.read().paused
    }

    /// Mirrored asset metadata, once a metadata event has been ingested.
    #[must_use]
    pub fn metadata(&self) -> Option<AssetMetadata> {
        self.inner.read().metadata.clone()
    }

    /// Whether an event identity has been ingested.
    #[must_use]
    pub fn contains_event(&self, id: &EventId) -> bool {
        self.inner.read().seen.contains(id)
    }

    /// Number of ingested events.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.inner.read().history.len()
    }

    /// Full history in ingestion order.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.inner.read().history.clone()
    }

    /// History entries whose subject or counterparty is the given account.
    #[must_use]
    pub fn history_for_account(&self, address: &Address) -> Vec<HistoryRecord> {
        self.inner
            .read()
            .history
            .iter()
            .filter(|record| match &record.event.payload {
                EventPayload::Transfer { from, to, .. } => from == address || to == address,
                other => other.subject() == Some(*address),
            })
            .cloned()
            .collect()
    }

    /// Number of materialized accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.inner.read().accounts.len()
    }
}

impl<S: ProjectionStorage> cc_state_model::StateView for ProjectionStore<S> {
    fn account(&self, address: &Address) -> shared_types::AccountState {
        self.inner
            .read()
            .accounts
            .get(address)
            .map(AccountRecord::as_state)
            .unwrap_or_default()
    }

    fn is_paused(&self) -> bool {
        self.paused()
    }
}
