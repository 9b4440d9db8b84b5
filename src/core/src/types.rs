//! Core types for the wallet console.

use crate::errors::ConfigError;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::PublicKey;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a wallet seed in bytes.
pub const SEED_BYTES: usize = 32;

/// Length of a wallet seed as a hex string.
pub const SEED_HEX_LEN: usize = SEED_BYTES * 2;

/// Configuration value that asks for a freshly generated seed.
pub const RANDOM_SEED_SENTINEL: &str = "random";

/// Length of an Ed25519 address (the BLAKE2b-256 hash of a public key).
pub const ED25519_ADDRESS_BYTES: usize = 32;

/// Length of an Ed25519 address as a hex string, without any prefix.
pub const ED25519_ADDRESS_HEX_LEN: usize = ED25519_ADDRESS_BYTES * 2;

/// Version tag of an Ed25519 address inside an encoded address.
pub const ADDRESS_VERSION_ED25519: u8 = 0;

/// Length of a versioned address (version tag + Ed25519 address).
pub const ADDRESS_BYTES: usize = ED25519_ADDRESS_BYTES + 1;

/// Human-readable prefix of mainnet addresses.
pub const MAINNET_HRP: &str = "iota";

/// Human-readable prefix of testnet addresses.
pub const TESTNET_HRP: &str = "atoi";

/// Prefixes that mark a receiver string as bech32 encoded.
pub const KNOWN_HRPS: [&str; 2] = [MAINNET_HRP, TESTNET_HRP];

/// Longest index an indexation payload may carry.
pub const MAX_INDEX_BYTES: usize = 64;

/// Base units per display unit.
pub const BASE_UNITS_PER_DISPLAY_UNIT: u64 = 1_000_000;

/// Blake2b with a 256-bit output.
pub type Blake2b256 = Blake2b<U32>;

/// Secret seed from which every wallet key is derived.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_BYTES]);

impl Seed {
    /// Creates a seed from raw bytes.
    pub fn from_bytes(bytes: [u8; SEED_BYTES]) -> Self {
        Self(bytes)
    }

    /// Generates a new seed from the operating system's RNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; SEED_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parses a seed from the configured string.
    ///
    /// Accepts either [`RANDOM_SEED_SENTINEL`] or exactly 64 hex characters.
    pub fn from_config(value: &str) -> Result<Self, ConfigError> {
        if value == RANDOM_SEED_SENTINEL {
            return Ok(Self::random());
        }

        if value.len() != SEED_HEX_LEN {
            return Err(ConfigError::InvalidSeedLength(value.len()));
        }

        let mut bytes = [0u8; SEED_BYTES];
        hex::decode_to_slice(value, &mut bytes)
            .map_err(|e| ConfigError::InvalidSeedHex(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Returns the seed bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_BYTES] {
        &self.0
    }
}

// Never print the secret itself
impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// An Ed25519 address: the BLAKE2b-256 hash of a public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ed25519Address(pub [u8; ED25519_ADDRESS_BYTES]);

impl Ed25519Address {
    /// Hashes a public key into its address.
    pub fn from_public_key(public: &PublicKey) -> Self {
        let digest = Blake2b256::digest(public.as_bytes());
        let mut address = [0u8; ED25519_ADDRESS_BYTES];
        address.copy_from_slice(&digest);
        Self(address)
    }

    /// Returns the address bytes.
    pub fn as_bytes(&self) -> &[u8; ED25519_ADDRESS_BYTES] {
        &self.0
    }

    /// Returns the address prefixed with its version tag.
    pub fn to_versioned(&self) -> [u8; ADDRESS_BYTES] {
        let mut versioned = [0u8; ADDRESS_BYTES];
        versioned[0] = ADDRESS_VERSION_ED25519;
        versioned[1..].copy_from_slice(&self.0);
        versioned
    }

    /// Returns the address as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Ed25519Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Address({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A derived wallet address at a given index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressRecord {
    /// The derivation index
    pub index: u32,
    /// The raw Ed25519 address
    pub address: Ed25519Address,
    /// The bech32 form under the active network prefix
    pub bech32: String,
}

impl AddressRecord {
    /// Returns the versioned raw address bytes.
    pub fn raw(&self) -> [u8; ADDRESS_BYTES] {
        self.address.to_versioned()
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr[{}]\n\t{}\n\t{}", self.index, self.address, self.bech32)
    }
}
