//! # Transition Rules
//!
//! Pure, side-effect-free mirrors of the ledger's own authorization and
//! compliance checks. Callers run these before submitting a write so that
//! predictably-failing operations never cost a round trip.
//!
//! A local pass is not atomic with submission: a concurrent pause or
//! whitelist change can still fail the write remotely, and the remote
//! verdict is authoritative.

use shared_types::{Address, Role, RuleError, U256};

use crate::ports::StateView;

/// Mint pre-check. Order: issuer role, recipient whitelist, amount, pause.
/// The first failing check wins.
pub fn can_mint<V: StateView>(
    view: &V,
    caller: &Address,
    to: &Address,
    amount: U256,
) -> Result<(), RuleError> {
    if !view.account(caller).has_role(Role::Issuer) {
        return Err(RuleError::Unauthorized {
            caller: *caller,
            required: Role::Issuer,
        });
    }
    if !view.account(to).whitelisted {
        return Err(RuleError::NotWhitelisted { account: *to });
    }
    if amount.is_zero() {
        return Err(RuleError::InvalidAmount);
    }
    if view.is_paused() {
        return Err(RuleError::Paused);
    }
    Ok(())
}

/// Burn pre-check. Order: amount, balance, pause.
pub fn can_burn<V: StateView>(
    view: &V,
    caller: &Address,
    amount: U256,
) -> Result<(), RuleError> {
    if amount.is_zero() {
        return Err(RuleError::InvalidAmount);
    }
    let available = view.account(caller).balance;
    if available < amount {
        return Err(RuleError::InsufficientBalance {
            required: amount,
            available,
        });
    }
    if view.is_paused() {
        return Err(RuleError::Paused);
    }
    Ok(())
}

/// Transfer pre-check. Order: sender whitelist, recipient whitelist,
/// balance, pause.
///
/// The whitelist check is skipped for the zero address on either side:
/// zero is the mint origin as sender and the burn sink as recipient. Mint
/// and burn do not route through this check, but any unified accounting
/// path relies on the exemption.
pub fn can_transfer<V: StateView>(
    view: &V,
    from: &Address,
    to: &Address,
    amount: U256,
) -> Result<(), RuleError> {
    if !from.is_zero() && !view.account(from).whitelisted {
        return Err(RuleError::NotWhitelisted { account: *from });
    }
    if !to.is_zero() && !view.account(to).whitelisted {
        return Err(RuleError::NotWhitelisted { account: *to });
    }
    let available = view.account(from).balance;
    if available < amount {
        return Err(RuleError::InsufficientBalance {
            required: amount,
            available,
        });
    }
    if view.is_paused() {
        return Err(RuleError::Paused);
    }
    Ok(())
}

/// Whitelist toggle pre-check (single-address form).
///
/// Returns `Ok(true)` when the flag would actually change, `Ok(false)` for
/// the idempotent no-op (adding an already-whitelisted target, removing a
/// non-whitelisted one).
pub fn can_set_whitelist<V: StateView>(
    view: &V,
    caller: &Address,
    target: &Address,
    new_status: bool,
) -> Result<bool, RuleError> {
    if !view.account(caller).has_role(Role::Admin) {
        return Err(RuleError::Unauthorized {
            caller: *caller,
            required: Role::Admin,
        });
    }
    Ok(view.account(target).whitelisted != new_status)
}

/// Batch whitelist-add pre-check.
///
/// Unlike the single-address form, duplicates and zero addresses are
/// silently skipped rather than surfaced. Returns the effective additions
/// in input order.
pub fn filter_whitelist_batch<V: StateView>(
    view: &V,
    caller: &Address,
    targets: &[Address],
) -> Result<Vec<Address>, RuleError> {
    if !view.account(caller).has_role(Role::Admin) {
        return Err(RuleError::Unauthorized {
            caller: *caller,
            required: Role::Admin,
        });
    }

    let mut seen = std::collections::HashSet::new();
    let mut effective = Vec::new();
    for target in targets {
        if target.is_zero() || view.account(target).whitelisted || !seen.insert(*target) {
            continue;
        }
        effective.push(*target);
    }
    Ok(effective)
}

/// Role grant/revoke pre-check. Only the root administrative role may
/// change role assignments; ADMIN and ISSUER never can.
pub fn can_change_role<V: StateView>(
    view: &V,
    caller: &Address,
    _role: Role,
    _target: &Address,
) -> Result<(), RuleError> {
    if !view.account(caller).has_role(Role::DefaultAdmin) {
        return Err(RuleError::Unauthorized {
            caller: *caller,
            required: Role::DefaultAdmin,
        });
    }
    Ok(())
}

/// Pause pre-check: ADMIN role, and the ledger must currently be running.
pub fn can_pause<V: StateView>(view: &V, caller: &Address) -> Result<(), RuleError> {
    if !view.account(caller).has_role(Role::Admin) {
        return Err(RuleError::Unauthorized {
            caller: *caller,
            required: Role::Admin,
        });
    }
    if view.is_paused() {
        return Err(RuleError::AlreadyInState);
    }
    Ok(())
}

/// Unpause pre-check: ADMIN role, and the ledger must currently be paused.
pub fn can_unpause<V: StateView>(view: &V, caller: &Address) -> Result<(), RuleError> {
    if !view.account(caller).has_role(Role::Admin) {
        return Err(RuleError::Unauthorized {
            caller: *caller,
            required: Role::Admin,
        });
    }
    if !view.is_paused() {
        return Err(RuleError::AlreadyInState);
    }
    Ok(())
}
