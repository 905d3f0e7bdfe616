//! # Domain Entities
//!
//! Value objects shared by every subsystem: addresses, hashes, roles,
//! account state, and the asset metadata replicated from the ledger.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for 256-bit balance arithmetic
pub use primitive_types::U256;

use crate::errors::TypeError;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte ledger account address.
///
/// Addresses are case-normalized at the parse boundary: any hex casing is
/// accepted, the canonical form is lowercase. The zero address doubles as
/// the mint origin and the burn sink on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000): mint origin and burn sink.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Canonical lowercase hex form with 0x prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    /// Parses a hex address, with or without 0x prefix, any casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped.to_ascii_lowercase())
            .map_err(|_| TypeError::InvalidAddress(s.to_string()))?;
        Self::from_slice(&bytes).ok_or_else(|| TypeError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; 20] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

// =============================================================================
// HASH (32 bytes)
// =============================================================================

/// A 32-byte hash (Keccak-256 transaction hashes, certification digests).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a hash from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 32 {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[30..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Ledger authorization roles.
///
/// `DefaultAdmin` is the root administrative role: the only role allowed to
/// grant or revoke roles. `Admin` gates whitelist and pause changes,
/// `Issuer` gates minting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Compliance administration: whitelist and pause switch.
    Admin,
    /// Token issuance: minting new units against custody receipts.
    Issuer,
    /// Root administrative role: the sole role admin.
    DefaultAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Issuer => write!(f, "ISSUER"),
            Role::DefaultAdmin => write!(f, "DEFAULT_ADMIN"),
        }
    }
}

// =============================================================================
// ACCOUNT STATE
// =============================================================================

/// Ledger-side state of a single account.
///
/// Balances use full 256-bit unsigned semantics; they are never floats and
/// never truncated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Token balance in base units.
    pub balance: U256,
    /// Whether the address may send or receive tokens.
    pub whitelisted: bool,
    /// Granted authorization roles.
    pub roles: BTreeSet<Role>,
}

impl AccountState {
    /// Account with a starting balance and no flags.
    #[must_use]
    pub fn with_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Returns true if the account holds the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// =============================================================================
// ASSET METADATA
// =============================================================================

/// Descriptive metadata for the tokenized commodity.
///
/// Replicated verbatim from the ledger; never computed locally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Commodity classification (e.g. "gold", "silver").
    pub commodity_type: String,
    /// Physical unit each token maps to (e.g. "troy_oz").
    pub unit: String,
    /// Total physical quantity under custody, in `unit`s.
    pub total_quantity: u64,
    /// Vault or warehouse identifier.
    pub storage_location: String,
    /// Digest of the custody certification document.
    pub certification_hash: Hash,
    /// Creation timestamp (unix seconds).
    pub created_at: u64,
    /// Last update timestamp (unix seconds).
    pub updated_at: u64,
}
