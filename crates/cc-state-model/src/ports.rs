//! # State View Port
//!
//! Read access to whatever account book a rule check runs against: the
//! projection mirror for pre-validation, or the authoritative book inside
//! the simulated ledger. Reads may be briefly stale relative to the ledger;
//! the ledger re-validates identically at submission time.

use shared_types::{AccountState, Address};

/// Read-only view of account state and the global pause flag.
pub trait StateView {
    /// State for an address. Unseen addresses are zero-balance accounts
    /// with no flags.
    fn account(&self, address: &Address) -> AccountState;

    /// Global compliance pause flag.
    fn is_paused(&self) -> bool;
}

// =============================================================================
// In-Memory View for Testing
// =============================================================================

/// Hash-map backed view for rule tests and fixtures.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStateView {
    accounts: std::collections::HashMap<Address, AccountState>,
    paused: bool,
}

impl InMemoryStateView {
    /// Empty, unpaused view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to one account, materializing it if unseen.
    pub fn account_mut(&mut self, address: Address) -> &mut AccountState {
        self.accounts.entry(address).or_default()
    }

    /// Sets the whitelist flag.
    pub fn set_whitelisted(&mut self, address: Address, status: bool) -> &mut Self {
        self.account_mut(address).whitelisted = status;
        self
    }

    /// Grants a role.
    pub fn grant_role(&mut self, address: Address, role: shared_types::Role) -> &mut Self {
        self.account_mut(address).roles.insert(role);
        self
    }

    /// Credits a balance.
    pub fn credit(&mut self, address: Address, amount: shared_types::U256) -> &mut Self {
        let account = self.account_mut(address);
        account.balance = account.balance.saturating_add(amount);
        self
    }

    /// Sets the pause flag.
    pub fn set_paused(&mut self, paused: bool) -> &mut Self {
        self.paused = paused;
        self
    }
}

impl StateView for InMemoryStateView {
    fn account(&self, address: &Address) -> AccountState {
        self.accounts.get(address).cloned().unwrap_or_default()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
